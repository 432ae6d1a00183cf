#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use telemetry_simulator::error::SinkError;
use telemetry_simulator::ReadingSink;

#[derive(Default, Debug)]
pub struct Recorded {
    pub frames: Vec<String>,
    pub closes: usize,
    pub writes_after_close: usize,
    pub rejected: usize,
}

/// Test sink that records frames and can simulate a consumer going away.
#[derive(Clone)]
pub struct RecordingSink {
    pub state: Arc<Mutex<Recorded>>,
    /// Send calls beyond this many fail with `Disconnected`.
    fail_after: Option<usize>,
    /// Consumer reports gone once this many frames were accepted.
    disconnect_after: Option<usize>,
    gone: Arc<watch::Sender<bool>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        let (gone, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(Recorded::default())),
            fail_after: None,
            disconnect_after: None,
            gone: Arc::new(gone),
        }
    }

    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::new()
        }
    }

    pub fn disconnecting_after(n: usize) -> Self {
        Self {
            disconnect_after: Some(n),
            ..Self::new()
        }
    }

    pub fn frames(&self) -> Vec<String> {
        self.state.lock().frames.clone()
    }

    pub fn closes(&self) -> usize {
        self.state.lock().closes
    }
}

#[async_trait]
impl ReadingSink for RecordingSink {
    async fn send(&mut self, frame: String) -> Result<(), SinkError> {
        let mut rec = self.state.lock();
        if rec.closes > 0 {
            rec.writes_after_close += 1;
            return Err(SinkError::Disconnected);
        }
        if *self.gone.borrow() || self.fail_after.is_some_and(|n| rec.frames.len() >= n) {
            rec.rejected += 1;
            return Err(SinkError::Disconnected);
        }
        rec.frames.push(frame);
        if self.disconnect_after.is_some_and(|n| rec.frames.len() >= n) {
            self.gone.send_replace(true);
        }
        Ok(())
    }

    async fn close(&mut self) {
        self.state.lock().closes += 1;
    }

    async fn disconnected(&self) {
        let mut rx = self.gone.subscribe();
        let _ = rx.wait_for(|gone| *gone).await;
    }
}
