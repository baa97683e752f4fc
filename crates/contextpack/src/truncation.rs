use std::borrow::Cow;

/// Marker appended to text cut short by [`excerpt`].
pub const ELLIPSIS: &str = "...";

/// Keep the first `max_chars` characters of `text`, appending `...` when
/// anything was dropped. Counts Unicode scalar values, never splitting one.
pub fn excerpt(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        None => Cow::Borrowed(text),
        Some((boundary, _)) => {
            let mut out = String::with_capacity(boundary + ELLIPSIS.len());
            out.push_str(&text[..boundary]);
            out.push_str(ELLIPSIS);
            Cow::Owned(out)
        }
    }
}

/// Slice `text` around the byte range `[start, end)`, widened by up to
/// `before` characters on the left and `after` characters on the right.
///
/// `start` and `end` must lie on character boundaries.
pub fn char_window(text: &str, start: usize, end: usize, before: usize, after: usize) -> &str {
    let from = if before == 0 {
        start
    } else {
        text[..start]
            .char_indices()
            .rev()
            .take(before)
            .last()
            .map(|(i, _)| i)
            .unwrap_or(start)
    };
    let to = text[end..]
        .char_indices()
        .nth(after)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    &text[from..to]
}

/// Short log-friendly prefix of model output.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        None => text,
        Some((boundary, _)) => &text[..boundary],
    }
}
