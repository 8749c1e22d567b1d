pub const COPY_SUCCESS: &str = "Page content copied to clipboard!";
pub const COPY_WITH_INSTRUCTIONS_SUCCESS: &str = "Page content copied with instructions!";
pub const COPY_FAILURE: &str = "Failed to copy text. Please try again.";
pub const TEXT_FAILURE: &str = "Failed to read page text.";
pub const ASSISTANT_TRUNCATED: &str = "Page text was shortened to fit the assistant link.";

pub const DEFAULT_BANNER_DURATION_MS: u64 = 3_000;

/// A fixed-position, self-dismissing on-page notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub duration_ms: u64,
}
