//! Report evidence encoding.
//!
//! Zero items: field absent. One item: the bare URL. Two or more: a JSON array
//! string. Readers accept either encoding.

/// Encodes evidence URLs for storage on a claim.
pub fn encode_evidence(urls: &[String]) -> Option<String> {
    match urls {
        [] => None,
        [single] => Some(single.clone()),
        many => serde_json::to_string(many).ok(),
    }
}

/// Decodes a stored evidence field back into URLs, preserving order.
pub fn decode_evidence(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        if let Ok(urls) = serde_json::from_str::<Vec<String>>(trimmed) {
            return urls;
        }
    }
    vec![trimmed.to_string()]
}
