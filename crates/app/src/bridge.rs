//! Entity bridge: one host entity mirroring one device.
//!
//! An [`EntityBridge`] owns the entity's current snapshot, the device's
//! channel pair and, while attached, the background read loop feeding the
//! snapshot. Commands go straight to the device; the entity state only ever
//! changes when the device confirms it on its outbound queue.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use hausbridge_domain::entity::{EntityKind, EntitySnapshot, EntityState, SensorValue};
use hausbridge_domain::error::ChannelError;
use hausbridge_domain::id::DeviceFqid;
use hausbridge_domain::message::Command;
use hausbridge_domain::translator::{StateTranslator, Translator};

use crate::ports::{DeviceChannel, HostNotifier};
use crate::read_loop::{DeviceReadLoop, LoopState};
use crate::ready::HostReady;

/// Host-facing entity backed by a device channel pair.
pub struct EntityBridge<C, N> {
    fqid: DeviceFqid,
    name: Option<String>,
    channel: Arc<C>,
    translator: Translator,
    notifier: N,
    ready: HostReady,
    snapshot: Arc<watch::Sender<EntitySnapshot>>,
    loop_state: Arc<watch::Sender<LoopState>>,
    read_task: Option<ReadTask>,
    _claim: Option<Arc<()>>,
}

struct ReadTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl<C, N> EntityBridge<C, N>
where
    C: DeviceChannel + 'static,
    N: HostNotifier + Clone + 'static,
{
    /// Create a detached bridge showing the translator's initial state.
    pub fn new(
        fqid: DeviceFqid,
        name: Option<String>,
        translator: Translator,
        channel: Arc<C>,
        notifier: N,
        ready: HostReady,
    ) -> Self {
        let initial =
            EntitySnapshot::initial(fqid.clone(), name.clone(), translator.initial_state());
        let (snapshot, _) = watch::channel(initial);
        let (loop_state, _) = watch::channel(LoopState::NotStarted);
        Self {
            fqid,
            name,
            channel,
            translator,
            notifier,
            ready,
            snapshot: Arc::new(snapshot),
            loop_state: Arc::new(loop_state),
            read_task: None,
            _claim: None,
        }
    }

    /// Hold `claim` for as long as the bridge lives, so whoever kept a weak
    /// reference to it can tell when the bridge is gone.
    #[must_use]
    pub(crate) fn with_claim(mut self, claim: Arc<()>) -> Self {
        self._claim = Some(claim);
        self
    }

    /// Start the read loop once the host is ready.
    ///
    /// Must be called from within a tokio runtime. Attaching an attached
    /// bridge does nothing, and a detached bridge cannot be attached again.
    pub fn attach(&mut self) {
        if self.read_task.is_some() {
            tracing::debug!(device = %self.fqid, "entity already attached");
            return;
        }
        if *self.loop_state.borrow() == LoopState::Stopped {
            tracing::warn!(device = %self.fqid, "entity was removed, not attaching again");
            return;
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let read_loop = DeviceReadLoop::new(
            self.fqid.clone(),
            Arc::clone(&self.channel),
            self.translator.clone(),
            Arc::clone(&self.snapshot),
            self.notifier.clone(),
        );
        let handle = tokio::spawn(read_loop.supervise(
            self.ready.listener(),
            shutdown_rx,
            Arc::clone(&self.loop_state),
        ));
        self.read_task = Some(ReadTask { shutdown, handle });
        tracing::debug!(device = %self.fqid, "entity attached, waiting for host");
    }

    /// Stop the read loop and wait for it to exit.
    ///
    /// A message being processed is finished first; messages still queued
    /// are left on the device's outbound queue. Detaching a bridge that was
    /// never attached does nothing.
    pub async fn detach(&mut self) {
        let Some(task) = self.read_task.take() else {
            tracing::debug!(device = %self.fqid, "entity not attached, nothing to detach");
            return;
        };

        task.shutdown.send_replace(true);
        if let Err(err) = task.handle.await {
            tracing::warn!(device = %self.fqid, %err, "device read loop ended abnormally");
        }
        self.loop_state.send_replace(LoopState::Stopped);
        tracing::info!(device = %self.fqid, "entity detached");
    }

    /// Ask the device to turn on. The state changes only once the device
    /// reports back.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the device side is gone.
    pub async fn turn_on(&self) -> Result<(), ChannelError> {
        self.apply_command(Command::on()).await
    }

    /// Ask the device to turn off. See [`turn_on`](Self::turn_on).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the device side is gone.
    pub async fn turn_off(&self) -> Result<(), ChannelError> {
        self.apply_command(Command::off()).await
    }

    /// Put a command on the device's inbound queue.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the device side is gone.
    pub async fn apply_command(&self, command: Command) -> Result<(), ChannelError> {
        tracing::debug!(
            device = %self.fqid,
            command = %command.to_message(),
            "sending command to device"
        );
        self.channel.send(command).await.inspect_err(|err| {
            tracing::warn!(device = %self.fqid, %err, "failed to send command to device");
        })
    }
}

impl<C, N> EntityBridge<C, N> {
    #[must_use]
    pub fn fqid(&self) -> &DeviceFqid {
        &self.fqid
    }

    /// Identifier the host uses to track this entity across restarts.
    #[must_use]
    pub fn unique_id(&self) -> &str {
        self.fqid.as_str()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.translator.kind()
    }

    #[must_use]
    pub fn snapshot(&self) -> EntitySnapshot {
        self.snapshot.borrow().clone()
    }

    #[must_use]
    pub fn state(&self) -> EntityState {
        self.snapshot.borrow().state.clone()
    }

    /// `true` for a switch whose device last reported `ON`.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.snapshot.borrow().state.is_on()
    }

    /// Last sensor reading, `None` for switches and before the first reading.
    #[must_use]
    pub fn value(&self) -> Option<SensorValue> {
        self.snapshot.borrow().state.value().cloned()
    }

    /// Configured unit of measurement (sensors only).
    #[must_use]
    pub fn unit(&self) -> Option<&str> {
        match &self.translator {
            Translator::Sensor(sensor) => sensor.unit(),
            Translator::Switch(_) => None,
        }
    }

    #[must_use]
    pub fn available(&self) -> bool {
        self.snapshot.borrow().available
    }

    /// State is pushed by the read loop, the host never needs to poll.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn should_poll(&self) -> bool {
        false
    }

    /// Watch the entity's snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EntitySnapshot> {
        self.snapshot.subscribe()
    }

    #[must_use]
    pub fn loop_state(&self) -> LoopState {
        *self.loop_state.borrow()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.read_task.is_some()
    }
}

impl<C, N> Drop for EntityBridge<C, N> {
    fn drop(&mut self) {
        if let Some(task) = self.read_task.take() {
            task.shutdown.send_replace(true);
        }
    }
}

impl<C, N> std::fmt::Debug for EntityBridge<C, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityBridge")
            .field("fqid", &self.fqid)
            .field("kind", &self.translator.kind())
            .field("attached", &self.read_task.is_some())
            .field("loop_state", &*self.loop_state.borrow())
            .finish_non_exhaustive()
    }
}
