//! Header construction for upstream requests
//!
//! Only the relay's own credential and attribution headers are sent
//! upstream; nothing from the client request is forwarded.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::{AppError, AppResult};

/// OpenRouter app attribution header
pub const HTTP_REFERER: HeaderName = HeaderName::from_static("http-referer");
/// OpenRouter app title header
pub const X_TITLE: HeaderName = HeaderName::from_static("x-title");

fn header_value(name: &str, value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        AppError::Internal(anyhow::anyhow!("{} contains characters not allowed in a header", name))
    })
}

/// Build the headers sent with every upstream request
pub fn build_default_headers(api_key: &str, referer: &str, title: &str) -> AppResult<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut auth = header_value("API key", &format!("Bearer {}", api_key))?;
    auth.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(HTTP_REFERER, header_value("Referer", referer)?);
    headers.insert(X_TITLE, header_value("App title", title)?);

    Ok(headers)
}
