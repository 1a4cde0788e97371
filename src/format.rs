//! Reply format detection for terminal highlighting.

use std::fmt;

/// Rendering style chosen for a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatTag {
    Python,
    Yaml,
    Json,
    Markdown,
}

impl FormatTag {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Markdown => "markdown",
        }
    }
}

impl fmt::Display for FormatTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Checked in order; first match wins.
const PREFIX_RULES: &[(&[&str], FormatTag)] = &[
    (&["class ", "def ", "import ", "@"], FormatTag::Python),
    (&["---", "#"], FormatTag::Yaml),
    (&["{", "["], FormatTag::Json),
];

/// Classifies `text` by the prefix of its trimmed form.
///
/// Anything unmatched, including empty text, is [`FormatTag::Markdown`]
/// since that renderer degrades gracefully on prose.
pub fn classify(text: &str) -> FormatTag {
    let trimmed = text.trim();
    PREFIX_RULES
        .iter()
        .find(|(prefixes, _)| prefixes.iter().any(|prefix| trimmed.starts_with(prefix)))
        .map_or(FormatTag::Markdown, |(_, tag)| *tag)
}
