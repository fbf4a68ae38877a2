//! Host readiness signal.
//!
//! Read loops must not start before the host has finished starting up.
//! The host fires [`HostReady`] once; every bridge attached before or after
//! that moment observes it through its own [`ReadyListener`].

use std::sync::Arc;

use tokio::sync::watch;

/// One-shot, multi-listener "host has started" signal.
#[derive(Debug, Clone)]
pub struct HostReady {
    sender: Arc<watch::Sender<bool>>,
}

impl Default for HostReady {
    fn default() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }
}

impl HostReady {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the host as started. Returns `true` on the first call only.
    pub fn fire(&self) -> bool {
        self.sender.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.sender.borrow()
    }

    /// Register interest in the signal.
    #[must_use]
    pub fn listener(&self) -> ReadyListener {
        ReadyListener {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Waits for a [`HostReady`] signal.
#[derive(Debug)]
pub struct ReadyListener {
    receiver: watch::Receiver<bool>,
}

impl ReadyListener {
    /// Resolve once the host is ready. Never resolves if the signal is
    /// dropped without firing.
    pub async fn wait(mut self) {
        loop {
            if *self.receiver.borrow_and_update() {
                return;
            }
            if self.receiver.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}
