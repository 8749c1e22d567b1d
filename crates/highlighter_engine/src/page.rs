use std::ops::Range;

use highlighter_core::{Banner, HighlightMarker};

use crate::PageError;

/// The DOM of one loaded page, as the agent needs it.
pub trait PageSurface {
    /// Current selection text, if any range is selected.
    fn selected_text(&self) -> Option<String>;
    /// Replaces the selected range with a single inline marker element.
    fn mark_selection(&mut self, marker: &HighlightMarker) -> Result<(), PageError>;
    fn clear_selection(&mut self);
    fn document_html(&self) -> String;
    fn show_banner(&mut self, banner: &Banner);
}

/// Page model backed by an HTML string. The selection is a byte range of the
/// source, and only text (never markup) is selectable.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    html: String,
    selection: Option<Range<usize>>,
    banners: Vec<Banner>,
}

impl MemoryPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            selection: None,
            banners: Vec::new(),
        }
    }

    /// Selects the first occurrence of `needle`; returns whether it was found.
    pub fn select(&mut self, needle: &str) -> bool {
        self.selection = self
            .html
            .find(needle)
            .map(|start| start..start + needle.len());
        self.selection.is_some()
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Number of marker elements carrying `class_name`.
    pub fn marker_count(&self, class_name: &str) -> usize {
        self.html.matches(&format!("class=\"{class_name}\"")).count()
    }
}

impl PageSurface for MemoryPage {
    fn selected_text(&self) -> Option<String> {
        self.selection
            .as_ref()
            .and_then(|range| self.html.get(range.clone()))
            .map(ToOwned::to_owned)
    }

    fn mark_selection(&mut self, marker: &HighlightMarker) -> Result<(), PageError> {
        let range = self.selection.clone().ok_or(PageError::NoSelection)?;
        if self.html.get(range.clone()).is_none() {
            return Err(PageError::Dom(format!("selection {range:?} is out of bounds")));
        }
        let element = format!(
            "<span class=\"{}\" style=\"background-color: {}\">{}</span>",
            marker.class_name,
            marker.background,
            escape_text(&marker.decorated)
        );
        self.html.replace_range(range, &element);
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    fn document_html(&self) -> String {
        self.html.clone()
    }

    fn show_banner(&mut self, banner: &Banner) {
        self.banners.push(banner.clone());
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
