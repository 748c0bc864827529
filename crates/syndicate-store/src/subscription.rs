//! Cancellation handles for change subscriptions.
//!
//! Each subscription runs as a tokio task that forwards change
//! notifications to a listener. The [`Subscription`] handle stops it:
//! once [`Subscription::cancel`] returns (or the handle is dropped) the
//! listener is not invoked again. A delivery that is already executing
//! when the handle is cancelled runs to completion.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Shared on/off switch checked before every delivery.
#[derive(Debug, Clone)]
pub struct Gate(Arc<AtomicBool>);

impl Gate {
    fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    /// Whether deliveries are still wanted.
    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Invoke `listener` with `value` unless the gate has been closed.
    pub fn deliver<T>(&self, listener: &mut impl FnMut(T), value: T) -> bool {
        if self.is_open() {
            listener(value);
            true
        } else {
            false
        }
    }
}

/// Handle to a running change subscription.
///
/// Dropping the handle cancels the subscription.
#[derive(Debug)]
pub struct Subscription {
    gate: Gate,
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Spawn the delivery loop produced by `run`.
    ///
    /// `run` receives the delivery [`Gate`] and a stop signal; it should
    /// return when the signal fires.
    pub fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(Gate, oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let gate = Gate::new();
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(run(gate.clone(), stop_rx));
        Self {
            gate,
            stop: Some(stop_tx),
            task: Some(task),
        }
    }

    /// Whether the subscription is still delivering.
    pub fn is_active(&self) -> bool {
        self.gate.is_open()
    }

    /// Stop delivery. No listener call starts after this returns.
    pub fn cancel(mut self) {
        self.shutdown();
    }

    /// Stop delivery and wait for the delivery task to finish.
    pub async fn cancel_and_wait(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!("subscription task ended abnormally: {e}");
            }
        }
    }

    fn shutdown(&mut self) {
        self.gate.close();
        if let Some(stop) = self.stop.take() {
            // The task may already have exited; nothing to signal then.
            let _ = stop.send(());
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_gate_blocks_delivery() {
        let gate = Gate::new();
        let mut seen = Vec::new();
        assert!(gate.deliver(&mut |v: u32| seen.push(v), 1));
        gate.close();
        assert!(!gate.deliver(&mut |v: u32| seen.push(v), 2));
        assert_eq!(seen, vec![1]);
    }

    #[tokio::test]
    async fn cancel_stops_task() {
        let sub = Subscription::spawn(|_gate, stop| async move {
            let _ = stop.await;
        });
        assert!(sub.is_active());
        sub.cancel_and_wait().await;
    }
}
