//! Device read loop: drains one device's outbound queue into entity state.
//!
//! The loop parks on [`DeviceChannel::receive`], which is its only
//! suspension point while running. Every dequeued message is marked done
//! before translation, so a message that fails to translate is dropped
//! exactly like one that succeeds. A failure is terminal to the current
//! message only:
//!
//! - translation errors are logged with the device and raw payload, and the
//!   entity state is left untouched;
//! - host notification errors are logged;
//! - a panic while processing a message is caught by the supervisor, which
//!   logs it and restarts the loop on the next message.
//!
//! The loop never exits on its own. It stops only when its shutdown flag is
//! raised; the flag is checked before every receive, and an in-flight
//! message always finishes processing first.

use std::sync::Arc;

use tokio::sync::watch;

use hausbridge_domain::entity::{EntitySnapshot, now};
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::message::Message;
use hausbridge_domain::translator::{StateTranslator, Translator};

use crate::ports::{DeviceChannel, HostNotifier};
use crate::ready::ReadyListener;

/// Lifecycle of a bridge's read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started yet: either not attached, or waiting for the host.
    NotStarted,
    /// Draining the device's outbound queue.
    Running,
    /// Torn down. Terminal.
    Stopped,
}

/// The per-device consumer task body.
pub(crate) struct DeviceReadLoop<C, N> {
    fqid: DeviceFqid,
    channel: Arc<C>,
    translator: Translator,
    snapshot: Arc<watch::Sender<EntitySnapshot>>,
    notifier: N,
}

impl<C, N: Clone> Clone for DeviceReadLoop<C, N> {
    fn clone(&self) -> Self {
        Self {
            fqid: self.fqid.clone(),
            channel: Arc::clone(&self.channel),
            translator: self.translator.clone(),
            snapshot: Arc::clone(&self.snapshot),
            notifier: self.notifier.clone(),
        }
    }
}

impl<C, N> DeviceReadLoop<C, N>
where
    C: DeviceChannel + 'static,
    N: HostNotifier + Clone + 'static,
{
    pub(crate) fn new(
        fqid: DeviceFqid,
        channel: Arc<C>,
        translator: Translator,
        snapshot: Arc<watch::Sender<EntitySnapshot>>,
        notifier: N,
    ) -> Self {
        Self {
            fqid,
            channel,
            translator,
            snapshot,
            notifier,
        }
    }

    /// Wait for the host, then keep the loop alive until shutdown.
    ///
    /// The loop body runs in its own task so that a panic while processing
    /// one message is contained: it is logged and the loop restarts.
    pub(crate) async fn supervise(
        self,
        ready: ReadyListener,
        mut shutdown: watch::Receiver<bool>,
        state: Arc<watch::Sender<LoopState>>,
    ) {
        tokio::select! {
            biased;
            () = cancelled(&mut shutdown) => {
                tracing::debug!(device = %self.fqid, "read loop cancelled before host was ready");
                return;
            }
            () = ready.wait() => {}
        }

        state.send_replace(LoopState::Running);
        tracing::info!(device = %self.fqid, "device read loop started");

        loop {
            let worker = tokio::spawn(self.clone().run(shutdown.clone()));
            match worker.await {
                Ok(()) => break,
                Err(err) if err.is_panic() => {
                    tracing::error!(
                        device = %self.fqid,
                        %err,
                        "device read loop panicked while processing a message, restarting"
                    );
                }
                Err(err) => {
                    tracing::debug!(device = %self.fqid, %err, "device read loop aborted");
                    break;
                }
            }
        }

        tracing::debug!(device = %self.fqid, "device read loop stopped");
    }

    /// Drain the outbound queue until shutdown.
    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        loop {
            let received = tokio::select! {
                biased;
                () = cancelled(&mut shutdown) => return,
                received = self.channel.receive() => received,
            };

            let Some(message) = received else {
                self.mark_unavailable().await;
                cancelled(&mut shutdown).await;
                return;
            };

            self.channel.task_done();
            self.process(message).await;
        }
    }

    async fn process(&self, message: Message) {
        tracing::debug!(device = %self.fqid, %message, "got message for device");

        let state = match self.translator.translate(&message) {
            Ok(state) => state,
            Err(err) => {
                tracing::error!(
                    device = %self.fqid,
                    %message,
                    %err,
                    "failed to translate device message, keeping current state"
                );
                return;
            }
        };

        self.snapshot.send_modify(|snapshot| snapshot.apply(state, now()));
        self.notify().await;
    }

    /// The device side is gone: flag the entity and wait to be torn down.
    async fn mark_unavailable(&self) {
        let was_available = self.snapshot.send_if_modified(|snapshot| {
            let was_available = snapshot.available;
            snapshot.available = false;
            was_available
        });
        if was_available {
            tracing::warn!(device = %self.fqid, "device channel closed, entity unavailable");
            self.notify().await;
        }
    }

    async fn notify(&self) {
        let snapshot = self.snapshot.borrow().clone();
        if let Err(err) = self.notifier.state_changed(snapshot).await {
            tracing::error!(device = %self.fqid, %err, "failed to schedule host update");
        }
    }
}

/// Resolve once the shutdown flag is raised or its sender is gone.
async fn cancelled(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
