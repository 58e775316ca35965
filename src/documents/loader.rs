//! Document loading
//!
//! Reads plain-text, markdown and JSON documents from the local file system.
//! A document that cannot be loaded yields a [`DocumentError`]; callers skip
//! it rather than failing the request.

use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Why a document was left out of the context
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    #[error("Path outside document root: {0}")]
    OutsideRoot(String),

    #[error("Error reading file: {0}")]
    Read(#[from] io::Error),

    #[error("Error reading file: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Document formats the relay can inline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Text,
    Markdown,
    Json,
}

impl DocumentKind {
    /// Classify a path by its extension, case-insensitively
    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "txt" => Ok(DocumentKind::Text),
            "md" => Ok(DocumentKind::Markdown),
            "json" => Ok(DocumentKind::Json),
            "" => Err(DocumentError::Unsupported(String::new())),
            other => Err(DocumentError::Unsupported(format!(".{}", other))),
        }
    }
}

/// Resolve a client-supplied path, confining it to `root` when one is set.
///
/// Confinement is lexical: `..` components that climb above the root are
/// rejected, absolute paths must already start with the root.
pub fn resolve_path(raw: &str, root: Option<&Path>) -> Result<PathBuf, DocumentError> {
    let path = Path::new(raw);
    let Some(root) = root else {
        return Ok(path.to_path_buf());
    };

    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(DocumentError::OutsideRoot(raw.to_string()));
                }
            }
            Component::CurDir => {}
            other => normalized.push(other.as_os_str()),
        }
    }

    if normalized.starts_with(root) {
        Ok(normalized)
    } else {
        Err(DocumentError::OutsideRoot(raw.to_string()))
    }
}

/// Load the text of one document.
///
/// JSON documents are re-serialized with two-space indentation; key order
/// is kept as written.
pub async fn load_document(raw: &str, root: Option<&Path>) -> Result<String, DocumentError> {
    let path = resolve_path(raw, root)?;

    if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
        return Err(DocumentError::NotFound(raw.to_string()));
    }

    match DocumentKind::from_path(&path)? {
        DocumentKind::Text | DocumentKind::Markdown => Ok(tokio::fs::read_to_string(&path).await?),
        DocumentKind::Json => {
            let text = tokio::fs::read_to_string(&path).await?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}
