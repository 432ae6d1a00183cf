use std::convert::Infallible;

use async_trait::async_trait;
use futures_util::stream::{self, Stream};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::SinkError;

/// Consumer-facing output of a telemetry stream.
#[async_trait]
pub trait ReadingSink: Send + Sync {
    /// Hands one encoded frame to the consumer. An error ends the stream.
    async fn send(&mut self, frame: String) -> Result<(), SinkError>;

    /// Releases the consumer. Called exactly once, after the last `send`.
    async fn close(&mut self);

    /// Resolves once the consumer has gone away.
    async fn disconnected(&self) {
        futures_util::future::pending::<()>().await
    }
}

/// Sink backed by a bounded tokio channel.
///
/// A full buffer is treated like a disconnect: the pump stops instead of
/// queueing more frames.
pub struct ChannelSink {
    tx: Option<mpsc::Sender<String>>,
}

impl ChannelSink {
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }
}

#[async_trait]
impl ReadingSink for ChannelSink {
    async fn send(&mut self, frame: String) -> Result<(), SinkError> {
        let tx = self.tx.as_ref().ok_or(SinkError::Disconnected)?;
        tx.try_send(frame).map_err(|e| match e {
            TrySendError::Full(_) => SinkError::Full,
            TrySendError::Closed(_) => SinkError::Disconnected,
        })
    }

    async fn close(&mut self) {
        self.tx.take();
    }

    async fn disconnected(&self) {
        if let Some(tx) = &self.tx {
            tx.closed().await;
        }
    }
}

/// Adapts the receiving half into a body stream; ends when the sink closes.
pub fn frame_stream(
    rx: mpsc::Receiver<String>,
) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static {
    stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|frame| (Ok(frame), rx))
    })
}
