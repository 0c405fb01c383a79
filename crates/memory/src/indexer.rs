//! Knowledge indexer: turns a pasted knowledge corpus into paragraph chunks.

/// Split raw knowledge text into trimmed, non-empty paragraphs.
///
/// Paragraphs are separated by one or more blank lines, where a blank line
/// is empty or whitespace-only. Single newlines stay inside a paragraph.
/// Order is preserved and `\r\n` endings are accepted.
pub fn split_paragraphs(raw: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            flush(&mut current, &mut chunks);
        } else {
            current.push(line);
        }
    }
    flush(&mut current, &mut chunks);

    chunks
}

fn flush(current: &mut Vec<&str>, chunks: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let paragraph = current.join("\n");
    let trimmed = paragraph.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    current.clear();
}
