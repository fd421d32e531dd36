//! Where outbound messages go.

use tokio::sync::mpsc::UnboundedSender;

use crate::messages::OutboundMessage;

/// The UI side of the message channel.
pub trait UiSink: Send + Sync {
    fn post(&self, message: OutboundMessage);
}

impl UiSink for UnboundedSender<OutboundMessage> {
    fn post(&self, message: OutboundMessage) {
        if self.send(message).is_err() {
            tracing::debug!("ui channel closed, dropping message");
        }
    }
}
