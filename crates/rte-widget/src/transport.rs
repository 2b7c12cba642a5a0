//! Host -> editor transports.

use rte_common::BridgeError;
use rte_webview::{HostCommand, WebViewHandle};
use tokio::sync::mpsc;
use tracing::debug;

/// The host side of the bridge: delivers commands to an editor surface.
///
/// Delivery is fire-and-forget and in order; there is no acknowledgement.
pub trait EditorTransport {
    fn send(&mut self, command: &HostCommand) -> Result<(), BridgeError>;

    /// Tear the surface down. Later sends fail with [`BridgeError::Closed`].
    fn close(&mut self);
}

impl EditorTransport for WebViewHandle {
    fn send(&mut self, command: &HostCommand) -> Result<(), BridgeError> {
        self.send_command(command)
    }

    fn close(&mut self) {
        // The WebView itself is destroyed when the handle is dropped.
        if let Err(e) = self.set_visible(false) {
            debug!(surface_id = self.surface_id(), error = %e, "failed to hide WebView on close");
        }
    }
}

/// A transport over a tokio channel, paired with a receiver the surface
/// (usually a [`crate::HeadlessSurface`]) reads from.
#[derive(Debug)]
pub struct ChannelTransport {
    sender: Option<mpsc::UnboundedSender<HostCommand>>,
}

impl ChannelTransport {
    pub fn pair() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.sender.as_ref().map_or(true, |tx| tx.is_closed())
    }
}

impl EditorTransport for ChannelTransport {
    fn send(&mut self, command: &HostCommand) -> Result<(), BridgeError> {
        let tx = self.sender.as_ref().ok_or(BridgeError::Closed)?;
        tx.send(command.clone()).map_err(|_| BridgeError::Closed)
    }

    fn close(&mut self) {
        self.sender = None;
    }
}
