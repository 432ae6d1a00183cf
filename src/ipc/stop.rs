use std::sync::Arc;

use tokio::sync::watch;

/// One-shot stop flag shared by every stream task.
#[derive(Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once `trigger` has been called on any clone.
    pub async fn triggered(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|stopped| *stopped).await.is_err() {
            // Sender lives in our own Arc, so this only happens during teardown.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn clones_observe_trigger() {
        let stop = StopSignal::new();
        let observer = stop.clone();
        assert!(!observer.is_triggered());

        let waiter = tokio::spawn(async move { observer.triggered().await });
        stop.trigger();
        tokio::time::timeout(Duration::from_millis(200), waiter)
            .await
            .expect("waiter should wake")
            .unwrap();
        assert!(stop.is_triggered());
    }

    #[tokio::test]
    async fn already_triggered_resolves_immediately() {
        let stop = StopSignal::new();
        stop.trigger();
        tokio::time::timeout(Duration::from_millis(50), stop.triggered())
            .await
            .expect("should not wait");
    }
}
