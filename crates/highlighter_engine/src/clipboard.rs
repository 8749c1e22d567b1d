use crate::ClipboardError;

/// Platform copy: stage the text somewhere selectable, copy, clean up.
pub trait Clipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Records every successful copy; can be armed to fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    copies: Vec<String>,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(error: ClipboardError) -> Self {
        Self {
            copies: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn last(&self) -> Option<&str> {
        self.copies.last().map(String::as_str)
    }

    pub fn copies(&self) -> &[String] {
        &self.copies
    }
}

impl Clipboard for MemoryClipboard {
    fn copy_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.copies.push(text.to_string());
        Ok(())
    }
}
