//! Cosmetic line wrapping of responses to the terminal width.

/// Wraps `text` so lines fit in `width` columns without splitting
/// words. Existing line breaks are kept as hard boundaries and only
/// whitespace characters are ever replaced, so the output has the same
/// length as the input.
///
/// Text whose total length already fits is returned as is, even when
/// one of its lines is longer than `width`.
pub fn reflow(text: &str, width: usize, enabled: bool) -> String {
    if !enabled || width == 0 || text.chars().count() <= width {
        return text.to_string();
    }

    let mut chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    while let Some(at) = next_break(&chars, pos, width) {
        chars[at] = '\n';
        pos = at + 1;
    }
    chars.into_iter().collect()
}

/// Index of the whitespace that ends the next line starting at or after
/// `from`, or `None` once only a final line that fits remains.
fn next_break(chars: &[char], from: usize, width: usize) -> Option<usize> {
    for start in from..chars.len() {
        let rest = &chars[start..];
        if rest.len() <= width && !rest.contains(&'\n') {
            return None;
        }

        // Longest prefix of at most `width` chars on this line that is
        // followed by whitespace. A word longer than `width` has none,
        // so slide forward until its end is in reach.
        let run = rest.iter().take(width).take_while(|c| **c != '\n').count();
        let fit = (1..=run)
            .rev()
            .find(|len| rest.get(*len).is_some_and(|c| c.is_whitespace()));
        if let Some(len) = fit {
            return Some(start + len);
        }
    }
    None
}
