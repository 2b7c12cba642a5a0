//! Host widget embedding the rich-text editor.
//!
//! [`HostWidget`] owns one editing session: it creates the editor surface,
//! waits for the readiness signal, injects the initial content exactly once
//! and forwards every content change to the embedding application. The
//! surface sits behind [`EditorTransport`], so the same widget drives the
//! real WebView, the in-process [`HeadlessSurface`], or a test channel.

pub mod errors;
pub mod surface;
pub mod transport;
pub mod widget;

pub use errors::WidgetError;
pub use surface::HeadlessSurface;
pub use transport::{ChannelTransport, EditorTransport};
pub use widget::{HostWidget, WidgetOptions, WidgetState};
