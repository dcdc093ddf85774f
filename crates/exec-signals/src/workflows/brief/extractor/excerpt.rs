pub const DEFAULT_EXCERPT_CHARS: usize = 160;

const ELLIPSIS: char = '\u{2026}';

/// Leading snippet of `text` bounded to `max_chars` characters. Whitespace is
/// collapsed, a truncated snippet is cut back to the last whole word and ends
/// with an ellipsis.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = match collapsed.char_indices().nth(max_chars) {
        Some((index, _)) => index,
        None => return collapsed,
    };

    let head = &collapsed[..cut];
    let ends_on_boundary = collapsed[cut..].starts_with(' ');
    let trimmed = if ends_on_boundary {
        head
    } else {
        head.rfind(' ').map_or(head, |space| &head[..space])
    };

    format!("{}{}", trimmed.trim_end(), ELLIPSIS)
}
