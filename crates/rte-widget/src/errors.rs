use rte_common::BridgeError;

/// Errors reported to the embedding application through `on_error`.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("failed to create editor surface: {0}")]
    SurfaceCreation(String),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("editor script error: {0}")]
    Script(String),

    #[error("widget has been disposed")]
    Disposed,
}
