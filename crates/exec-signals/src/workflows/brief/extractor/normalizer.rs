pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .replace(['\u{2018}', '\u{2019}'], "'");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// True when `keyword` occurs in `haystack` starting at a word boundary.
/// Both sides are expected to be normalized already.
pub(crate) fn matches_at_word_start(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return false;
    }

    haystack.match_indices(keyword).any(|(start, _)| {
        haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |previous| !previous.is_alphanumeric())
    })
}
