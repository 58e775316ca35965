/// Buffer that reassembles SSE lines from arbitrarily split byte chunks.
///
/// Bytes are kept raw until a `\n` arrives, so a multi-byte UTF-8 character
/// split across two network chunks decodes correctly. A trailing `\r` is
/// stripped from each line.
///
/// # Example
/// ```
/// use studio_relay::streaming::SseLineBuffer;
///
/// let mut buffer = SseLineBuffer::new();
///
/// assert!(buffer.feed(b"data: {\"content\":\"hel").is_empty());
/// assert_eq!(buffer.feed(b"lo\"}\r\n"), vec!["data: {\"content\":\"hello\"}"]);
/// ```
#[derive(Debug, Default)]
pub struct SseLineBuffer {
    pending: Vec<u8>,
}

impl SseLineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` and drain every line completed by them.
    ///
    /// Blank lines (SSE event separators) are dropped.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let Some(last_newline) = self.pending.iter().rposition(|&b| b == b'\n') else {
            return Vec::new();
        };

        let rest = self.pending.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.pending, rest);

        complete
            .split(|&b| b == b'\n')
            .filter_map(decode)
            .collect()
    }

    /// Take whatever is left once the upstream has closed.
    pub fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.pending);
        decode(&rest)
    }

    /// Whether bytes without a terminating newline are still held
    pub fn has_incomplete(&self) -> bool {
        !self.pending.is_empty()
    }
}

fn decode(raw: &[u8]) -> Option<String> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(raw).into_owned())
    }
}
