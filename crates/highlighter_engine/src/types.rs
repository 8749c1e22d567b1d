use thiserror::Error;

/// Browser tab identifier, as handed out by the tab messenger.
pub type TabId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("settings store unavailable: {0}")]
    Unavailable(String),
    #[error("settings value for {key} could not be encoded: {message}")]
    Encoding { key: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("no active tab")]
    NoActiveTab,
    #[error("tab {0} is not listening")]
    TabClosed(TabId),
    #[error("messaging failed: {0}")]
    Platform(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("could not stage text for copying: {0}")]
    StagingUnavailable(String),
    #[error("copy command rejected: {0}")]
    CopyRejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("invalid asset path {path}: {message}")]
    InvalidPath { path: String, message: String },
    #[error("asset {path} returned http status {status}")]
    HttpStatus { path: String, status: u16 },
    #[error("asset {path} exceeds {max_bytes} bytes")]
    TooLarge { path: String, max_bytes: u64 },
    #[error("asset {path} is not valid {encoding} text")]
    Decode { path: String, encoding: String },
    #[error("fetching asset failed: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("nothing is selected")]
    NoSelection,
    #[error("page rejected the marker: {0}")]
    Dom(String),
}
