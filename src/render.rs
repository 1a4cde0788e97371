//! Terminal rendering of replies.
//!
//! Renderers turn reply text into styled terminal output for a given
//! [`FormatTag`]. Callers fall back to the raw text on [`RenderError`].

use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};
use thiserror::Error;

use crate::format::FormatTag;

const THEME_NAME: &str = "base16-eighties.dark";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no syntax definition available for {0}")]
    MissingSyntax(FormatTag),
    #[error("no highlighting theme available")]
    MissingTheme,
    #[error("highlighting failed: {0}")]
    Highlight(#[from] syntect::Error),
}

/// Turns reply text into display text.
pub trait Renderer: Send + Sync {
    fn render(&self, text: &str, tag: FormatTag) -> Result<String, RenderError>;
}

struct SyntectAssets {
    syntax_set: SyntaxSet,
    theme: Option<Theme>,
}

/// Loads the bundled syntaxes and theme once per process.
fn syntect_assets() -> &'static SyntectAssets {
    static ASSETS: OnceLock<SyntectAssets> = OnceLock::new();
    ASSETS.get_or_init(|| {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(THEME_NAME)
            .or_else(|| theme_set.themes.into_values().next());
        SyntectAssets { syntax_set, theme }
    })
}

/// Highlights replies with 24-bit ANSI escapes using syntect's bundled
/// grammars.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectRenderer;

impl SyntectRenderer {
    fn syntax_for(syntax_set: &SyntaxSet, tag: FormatTag) -> Option<&SyntaxReference> {
        let (name, extension) = match tag {
            FormatTag::Python => ("Python", "py"),
            FormatTag::Yaml => ("YAML", "yaml"),
            FormatTag::Json => ("JSON", "json"),
            FormatTag::Markdown => ("Markdown", "md"),
        };
        syntax_set
            .find_syntax_by_name(name)
            .or_else(|| syntax_set.find_syntax_by_extension(extension))
    }
}

impl Renderer for SyntectRenderer {
    fn render(&self, text: &str, tag: FormatTag) -> Result<String, RenderError> {
        let assets = syntect_assets();
        let syntax = Self::syntax_for(&assets.syntax_set, tag)
            .ok_or(RenderError::MissingSyntax(tag))?;
        let theme = assets.theme.as_ref().ok_or(RenderError::MissingTheme)?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut rendered = String::with_capacity(text.len() * 2);
        for line in LinesWithEndings::from(text) {
            let ranges = highlighter.highlight_line(line, &assets.syntax_set)?;
            rendered.push_str(&as_24_bit_terminal_escaped(&ranges, false));
        }
        rendered.push_str(RESET);
        Ok(rendered)
    }
}

/// Renders `text`, returning it unstyled if the renderer fails.
pub fn render_or_plain(renderer: &dyn Renderer, text: &str, tag: FormatTag) -> String {
    match renderer.render(text, tag) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::debug!(error = %e, format = %tag, "render failed, showing plain text");
            text.to_string()
        }
    }
}
