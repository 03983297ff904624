pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    // `str::split('\n')` preserves trailing empty segments (N newlines => N+1 lines).
    // Lines keep any trailing '\r': comparison is on the raw text.
    text.split('\n').collect()
}

/// `line` without a trailing carriage return, for display.
pub(crate) fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}
