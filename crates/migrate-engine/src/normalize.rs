//! Input canonicalization applied before any rule runs

/// Normalize raw input text.
///
/// Steps run in a fixed order: escaped `\n` sequences become real newlines,
/// CRLF becomes LF, tabs become two spaces, and trailing whitespace is trimmed
/// from the end of the whole text. Interior lines keep their trailing spaces.
pub fn normalize(raw: &str) -> String {
    raw.replace("\\n", "\n")
        .replace("\r\n", "\n")
        .replace('\t', "  ")
        .trim_end()
        .to_string()
}

/// Number of newline-delimited segments in `text` (an empty text has one)
pub fn count_lines(text: &str) -> usize {
    text.split('\n').count()
}
