use serde::{Deserialize, Serialize};

/// Markdown-flavoured decoration applied to highlighted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HighlightStyle {
    /// `*text*`
    Emphasis,
    /// `**text**`
    #[default]
    Strong,
}

impl HighlightStyle {
    fn delimiter(self) -> &'static str {
        match self {
            HighlightStyle::Emphasis => "*",
            HighlightStyle::Strong => "**",
        }
    }
}

/// What the page surface inserts in place of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub decorated: String,
    pub background: String,
    pub class_name: String,
}

pub const DEFAULT_MARKER_BACKGROUND: &str = "yellow";
pub const DEFAULT_MARKER_CLASS: &str = "page-highlighter-mark";

/// Decorates a selection, or returns `None` when it is blank.
pub fn decorate(selection: &str, style: HighlightStyle) -> Option<String> {
    let text = selection.trim();
    if text.is_empty() {
        return None;
    }
    let delimiter = style.delimiter();
    Some(format!("{delimiter}{text}{delimiter}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_is_the_default_form() {
        assert_eq!(
            decorate("  key point \n", HighlightStyle::default()).as_deref(),
            Some("**key point**")
        );
    }

    #[test]
    fn emphasis_uses_single_asterisks() {
        assert_eq!(
            decorate("note", HighlightStyle::Emphasis).as_deref(),
            Some("*note*")
        );
    }

    #[test]
    fn whitespace_only_selection_is_ignored() {
        assert_eq!(decorate(" \t\n", HighlightStyle::Strong), None);
        assert_eq!(decorate("", HighlightStyle::Emphasis), None);
    }
}
