use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures on the host <-> editor message channel.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("failed to encode bridge message: {0}")]
    Encode(String),

    #[error("failed to decode bridge message: {0}")]
    Decode(String),

    #[error("unknown bridge message kind: {0}")]
    UnknownKind(String),

    #[error("bridge message of {size} bytes exceeds limit of {limit} bytes")]
    Oversized { size: usize, limit: usize },

    #[error("bridge channel closed")]
    Closed,

    #[error("script evaluation failed: {0}")]
    Script(String),
}

/// Rejected document edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocError {
    #[error("node index {index} out of range (document has {len} nodes)")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("node {0} is not a table")]
    NotATable(usize),

    #[error("node {0} is not an image")]
    NotAnImage(usize),

    #[error("node {0} is not a paragraph")]
    NotAParagraph(usize),

    #[error("node {0} is not an info box")]
    NotAnInfoBox(usize),

    #[error("node {0} is not a multiple-choice question")]
    NotAnMcq(usize),

    #[error("single-choice question has {0} correct options")]
    TooManyCorrect(usize),

    #[error("cell ({row}, {col}) out of range")]
    CellOutOfRange { row: usize, col: usize },

    #[error("invalid style: {0}")]
    InvalidStyle(String),

    #[error("comment thread not found: {0}")]
    ThreadNotFound(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Doc(#[from] DocError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("webview error: {0}")]
    WebView(String),

    #[error("{0}")]
    Other(String),
}
