//! Splitting the final report into progressive content chunks.

const BREAK_CHARS: [char; 8] = [' ', '\n', '.', ',', '!', '?', ';', ':'];

/// Split `text` into chunks that end at whitespace or punctuation, or after
/// `max_len` characters. Concatenating the chunks yields `text`.
pub fn chunk_report(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for ch in text.chars() {
        current.push(ch);
        current_len += 1;
        if BREAK_CHARS.contains(&ch) || current_len >= max_len {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

/// Cumulative prefixes of the chunked text, one per chunk
pub fn cumulative_chunks(text: &str, max_len: usize) -> Vec<String> {
    let mut acc = String::with_capacity(text.len());
    chunk_report(text, max_len)
        .into_iter()
        .map(|chunk| {
            acc.push_str(&chunk);
            acc.clone()
        })
        .collect()
}
