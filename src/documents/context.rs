//! Bounded document context formatting

/// Appended to a document that was cut short to fit the budget
pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";
/// A truncated document is only kept if at least this many characters fit
pub const MIN_TRUNCATED_CHARS: usize = 100;

const SECTION_SEPARATOR: &str = "\n";

fn section_header(number: usize) -> String {
    format!("\n--- DOCUMENT {} ---\n", number)
}

/// Prefix of `text` holding at most `max_chars` characters
fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Join document contents into one context string of at most `char_budget`
/// characters.
///
/// Documents are numbered from 1 in the order given. Headers, separators and
/// the truncation marker all count against the budget. The first document
/// that does not fit whole is truncated (if at least
/// [`MIN_TRUNCATED_CHARS`] of it fit) or dropped, and nothing after it is
/// included.
pub fn format_documents_for_context<S: AsRef<str>>(documents: &[S], char_budget: usize) -> String {
    let mut context = String::new();
    let mut used = 0usize;

    for (idx, doc) in documents.iter().enumerate() {
        let doc = doc.as_ref();
        let header = section_header(idx + 1);
        let separator = if idx == 0 { "" } else { SECTION_SEPARATOR };
        let overhead = separator.chars().count() + header.chars().count();
        let doc_chars = doc.chars().count();

        if used + overhead + doc_chars <= char_budget {
            context.push_str(separator);
            context.push_str(&header);
            context.push_str(doc);
            used += overhead + doc_chars;
            continue;
        }

        let available = char_budget
            .saturating_sub(used + overhead + TRUNCATION_MARKER.chars().count());
        if available >= MIN_TRUNCATED_CHARS {
            context.push_str(separator);
            context.push_str(&header);
            context.push_str(take_chars(doc, available));
            context.push_str(TRUNCATION_MARKER);
        }
        break;
    }

    context
}
