//! Pull a JSON array out of free-form model output.
//!
//! Models wrap JSON in prose or markdown fences despite instructions, so the
//! response is searched for:
//! - ```json code blocks
//! - Plain ``` code blocks
//! - Raw JSON

/// Extract a JSON array from `text`
pub fn extract_json_array(text: &str) -> Option<&str> {
    extract_fenced(text)
        .filter(|content| content.starts_with('['))
        .or_else(|| extract_raw(text, '[', ']'))
}

fn extract_fenced(text: &str) -> Option<&str> {
    if let Some(start) = text.find("```json") {
        let json_start = start + 7;
        if let Some(end) = text[json_start..].find("```") {
            return Some(text[json_start..json_start + end].trim());
        }
    }

    let start = text.find("```")?;
    let block_start = start + 3;
    let content_start = text[block_start..]
        .find('\n')
        .map(|i| block_start + i + 1)
        .unwrap_or(block_start);
    let end = text[content_start..].find("```")?;
    Some(text[content_start..content_start + end].trim())
}

fn extract_raw(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}
