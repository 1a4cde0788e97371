/// Keyword that ends the session.
pub const EXIT_KEYWORD: &str = "quit";

/// Input types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    /// Anything else, forwarded verbatim (including blank lines).
    Text(String),
}

/// Classifies one raw input line.
///
/// The exit keyword is matched case-insensitively after whitespace
/// normalization; there is no prefix matching, so `quitting` is text.
pub fn parse_input(line: &str) -> Input {
    let normalized = line.split_whitespace().collect::<Vec<_>>().join(" ");

    if normalized.eq_ignore_ascii_case(EXIT_KEYWORD) {
        Input::Quit
    } else {
        Input::Text(line.to_string())
    }
}
