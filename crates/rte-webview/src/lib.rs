//! WebView bridge for the embedded rich-text editor.
//!
//! Wraps the `wry` crate to provide:
//! - A managed child WebView hosting the editor page
//! - The typed host/editor message protocol and its IPC encoding
//! - A custom `rte://` protocol serving the bundled editor page
//! - Navigation control and page-load events

pub mod content;
pub mod events;
pub mod ipc;
pub mod manager;
pub mod protocol;

pub use content::ContentProvider;
pub use events::{PageLoadState, WebViewEvent};
pub use ipc::{IpcMessage, IpcPayload};
pub use manager::{WebViewConfig, WebViewHandle, WebViewManager};
pub use protocol::{decode_event, encode_command, EditorEvent, HostCommand};
