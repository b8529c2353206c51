/// Normalize a free-text label for exact matching: trim and lowercase.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// First whitespace-delimited token of a normalized label.
pub fn first_token(label: &str) -> Option<&str> {
    label.split_whitespace().next()
}

/// True if the normalized `text` contains any of `keywords` as a substring.
pub fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| {
        let k = normalize_label(k);
        !k.is_empty() && text.contains(k.as_str())
    })
}
