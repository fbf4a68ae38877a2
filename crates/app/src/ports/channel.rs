//! Channel port — the queue pair connecting a bridge to one device.
//!
//! The device runtime owns the other end: it produces on the outbound
//! (state) queue and consumes the inbound (command) queue. The bridge is the
//! sole consumer of the former and the sole producer onto the latter.

use std::future::Future;
use std::sync::Arc;

use hausbridge_domain::error::ChannelError;
use hausbridge_domain::message::{Command, Message};

/// A device's `{in_queue, out_queue}` pair, seen from the bridge.
pub trait DeviceChannel: Send + Sync {
    /// Wait for the next state message from the device.
    ///
    /// Resolves to `None` once the device side is gone and the queue is
    /// drained. Must be cancel-safe: dropping the future before it resolves
    /// must not lose a message.
    fn receive(&self) -> impl Future<Output = Option<Message>> + Send;

    /// Mark the last received message as processed, keeping the producer's
    /// accounting of outstanding messages correct.
    fn task_done(&self);

    /// Enqueue a command for the device.
    ///
    /// Resolves once the queue has accepted the command, not once the
    /// device has acted on it.
    fn send(&self, command: Command) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

impl<T: DeviceChannel> DeviceChannel for Arc<T> {
    fn receive(&self) -> impl Future<Output = Option<Message>> + Send {
        (**self).receive()
    }

    fn task_done(&self) {
        (**self).task_done();
    }

    fn send(&self, command: Command) -> impl Future<Output = Result<(), ChannelError>> + Send {
        (**self).send(command)
    }
}
