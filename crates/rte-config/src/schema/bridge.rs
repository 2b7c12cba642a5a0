//! Bridge (host <-> editor) configuration types.

use serde::{Deserialize, Serialize};

/// Controls how the editor page reports content changes and how large a
/// single bridge message may be.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Quiet period after the last input before `ContentChanged` is sent
    /// (valid range: 0-5000). Zero sends on every input event.
    pub change_debounce_ms: u32,
    /// Flush a pending change immediately when the editor loses focus.
    pub emit_on_blur: bool,
    /// Upper bound for one inbound message in bytes (valid range: 1 KiB - 64 MiB).
    pub max_message_bytes: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            change_debounce_ms: 250,
            emit_on_blur: true,
            max_message_bytes: 8 * 1024 * 1024,
        }
    }
}
