//! Proxy module
//!
//! Handles request forwarding to the upstream chat completion provider.

pub mod headers;
pub mod logging;
pub mod openrouter;
pub mod provider;

pub use logging::RequestContext;
pub use openrouter::OpenRouterClient;
pub use provider::{ByteStream, ChatProvider, Completion};
