//! Message assembly
//!
//! Builds the ordered turn list sent upstream: a synthesized system turn,
//! optionally carrying local document context, followed by the client's
//! conversation unchanged.

mod context;
mod loader;

use std::path::Path;

use futures::future::join_all;
use tracing::debug;

pub use context::{format_documents_for_context, MIN_TRUNCATED_CHARS, TRUNCATION_MARKER};
pub use loader::{load_document, resolve_path, DocumentError, DocumentKind};

use crate::models::ChatTurn;

pub const CONTEXT_PREAMBLE: &str = "The following documents are provided for reference:";
pub const CONTEXT_POSTAMBLE: &str =
    "Please use this information to inform your responses when relevant.";

/// Settings for document context injection
#[derive(Debug, Clone, Copy)]
pub struct AssemblyOptions<'a> {
    /// Maximum characters of formatted document context
    pub char_budget: usize,
    /// Directory documents must live under, if any
    pub document_root: Option<&'a Path>,
}

/// Build the system prompt, with document context appended when any
/// document could be loaded.
pub async fn build_system_prompt(
    system_prompt: &str,
    document_paths: &[String],
    options: AssemblyOptions<'_>,
) -> String {
    if document_paths.is_empty() {
        return system_prompt.to_string();
    }

    let loaded = join_all(
        document_paths
            .iter()
            .map(|path| load_document(path, options.document_root)),
    )
    .await;

    let contents: Vec<String> = loaded
        .into_iter()
        .zip(document_paths)
        .filter_map(|(result, path)| match result {
            Ok(text) => Some(text),
            Err(e) => {
                debug!(path = %path, reason = %e, "Skipping document");
                None
            }
        })
        .collect();

    if contents.is_empty() {
        return system_prompt.to_string();
    }

    let context = format_documents_for_context(&contents, options.char_budget);
    debug!(
        requested = document_paths.len(),
        loaded = contents.len(),
        context_chars = context.chars().count(),
        "Document context assembled"
    );

    format!(
        "{}\n\n{}\n\n{}\n\n{}",
        system_prompt, CONTEXT_PREAMBLE, context, CONTEXT_POSTAMBLE
    )
}

/// Assemble the turns sent upstream: system turn first, then `turns` in
/// their original order.
pub async fn assemble(
    turns: &[ChatTurn],
    system_prompt: &str,
    document_paths: &[String],
    options: AssemblyOptions<'_>,
) -> Vec<ChatTurn> {
    let system = build_system_prompt(system_prompt, document_paths, options).await;

    let mut ordered = Vec::with_capacity(turns.len() + 1);
    ordered.push(ChatTurn::system(system));
    ordered.extend_from_slice(turns);
    ordered
}
