//! In-process channel pair backed by bounded tokio [`mpsc`] queues.
//!
//! [`InProcessChannel::pair`] returns the bridge half (implementing
//! [`DeviceChannel`]) and the [`DeviceEndpoint`] handed to the device
//! runtime. The endpoint counts published messages that the bridge has not
//! yet marked done, so a producer can [`join`](DeviceEndpoint::join) on them.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, watch};

use hausbridge_domain::error::ChannelError;
use hausbridge_domain::message::{Command, Message};

use crate::ports::DeviceChannel;

/// Bridge half of an in-process channel pair.
#[derive(Debug)]
pub struct InProcessChannel {
    commands: mpsc::Sender<Command>,
    messages: Mutex<mpsc::Receiver<Message>>,
    unfinished: Arc<watch::Sender<usize>>,
}

/// Device half of an in-process channel pair.
#[derive(Debug)]
pub struct DeviceEndpoint {
    messages: mpsc::Sender<Message>,
    commands: mpsc::Receiver<Command>,
    unfinished: Arc<watch::Sender<usize>>,
}

impl InProcessChannel {
    /// Create a connected pair whose queues each hold up to `capacity`
    /// items (at least one).
    #[must_use]
    pub fn pair(capacity: usize) -> (Self, DeviceEndpoint) {
        let capacity = capacity.max(1);
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let (message_tx, message_rx) = mpsc::channel(capacity);
        let (unfinished, _) = watch::channel(0);
        let unfinished = Arc::new(unfinished);

        let channel = Self {
            commands: command_tx,
            messages: Mutex::new(message_rx),
            unfinished: Arc::clone(&unfinished),
        };
        let endpoint = DeviceEndpoint {
            messages: message_tx,
            commands: command_rx,
            unfinished,
        };
        (channel, endpoint)
    }

    /// Messages published by the device and not yet marked done.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.unfinished.borrow()
    }
}

impl DeviceChannel for InProcessChannel {
    async fn receive(&self) -> Option<Message> {
        self.messages.lock().await.recv().await
    }

    fn task_done(&self) {
        self.unfinished.send_modify(|n| *n = n.saturating_sub(1));
    }

    async fn send(&self, command: Command) -> Result<(), ChannelError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

impl DeviceEndpoint {
    /// Publish a state message on the outbound queue, waiting for room.
    ///
    /// Cancel safe: the message is only counted once a slot is reserved, so
    /// dropping the future while the queue is full leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Closed`] if the bridge half was dropped.
    pub async fn publish(&self, message: Message) -> Result<(), ChannelError> {
        let permit = self
            .messages
            .reserve()
            .await
            .map_err(|_| ChannelError::Closed)?;
        self.unfinished.send_modify(|n| *n += 1);
        permit.send(message);
        Ok(())
    }

    /// Wait for the next command from the bridge.
    ///
    /// Returns `None` once the bridge half was dropped and all queued
    /// commands were received.
    pub async fn next_command(&mut self) -> Option<Command> {
        self.commands.recv().await
    }

    /// Take a queued command without waiting.
    pub fn try_next_command(&mut self) -> Option<Command> {
        self.commands.try_recv().ok()
    }

    /// Messages published and not yet marked done by the bridge.
    #[must_use]
    pub fn pending(&self) -> usize {
        *self.unfinished.borrow()
    }

    /// Wait until every published message has been marked done.
    pub async fn join(&self) {
        let mut unfinished = self.unfinished.subscribe();
        loop {
            if *unfinished.borrow_and_update() == 0 {
                return;
            }
            if unfinished.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn should_deliver_messages_in_fifo_order() {
        let (channel, endpoint) = InProcessChannel::pair(8);
        endpoint.publish(Message::with_state(1)).await.unwrap();
        endpoint.publish(Message::with_state(2)).await.unwrap();

        assert_eq!(channel.receive().await, Some(Message::with_state(1)));
        assert_eq!(channel.receive().await, Some(Message::with_state(2)));
    }

    #[tokio::test]
    async fn should_count_messages_until_marked_done() {
        let (channel, endpoint) = InProcessChannel::pair(8);
        endpoint.publish(Message::with_state("ON")).await.unwrap();
        endpoint.publish(Message::with_state("OFF")).await.unwrap();
        assert_eq!(endpoint.pending(), 2);

        channel.receive().await.unwrap();
        channel.task_done();
        assert_eq!(channel.pending(), 1);
        assert_eq!(endpoint.pending(), 1);
    }

    #[tokio::test]
    async fn should_join_once_all_messages_are_done() {
        let (channel, endpoint) = InProcessChannel::pair(8);
        endpoint.publish(Message::with_state("ON")).await.unwrap();

        let consumer = tokio::spawn(async move {
            channel.receive().await.unwrap();
            channel.task_done();
        });

        tokio::time::timeout(Duration::from_secs(1), endpoint.join())
            .await
            .unwrap();
        consumer.await.unwrap();
        assert_eq!(endpoint.pending(), 0);
    }

    #[tokio::test]
    async fn should_deliver_commands_to_device() {
        let (channel, mut endpoint) = InProcessChannel::pair(8);
        channel.send(Command::on()).await.unwrap();
        assert_eq!(endpoint.next_command().await, Some(Command::on()));
        assert_eq!(endpoint.try_next_command(), None);
    }

    #[tokio::test]
    async fn should_report_closed_when_device_is_gone() {
        let (channel, endpoint) = InProcessChannel::pair(8);
        drop(endpoint);
        assert_eq!(channel.send(Command::off()).await, Err(ChannelError::Closed));
        assert_eq!(channel.receive().await, None);
    }

    #[tokio::test]
    async fn should_report_closed_when_bridge_is_gone() {
        let (channel, endpoint) = InProcessChannel::pair(8);
        drop(channel);
        let result = endpoint.publish(Message::with_state("ON")).await;
        assert_eq!(result, Err(ChannelError::Closed));
        assert_eq!(endpoint.pending(), 0);
    }

    #[tokio::test]
    async fn should_not_count_publish_cancelled_while_queue_is_full() {
        let (channel, endpoint) = InProcessChannel::pair(1);
        endpoint.publish(Message::with_state(1)).await.unwrap();

        let blocked = tokio::time::timeout(
            Duration::from_millis(20),
            endpoint.publish(Message::with_state(2)),
        )
        .await;
        assert!(blocked.is_err());
        assert_eq!(endpoint.pending(), 1);

        assert_eq!(channel.receive().await, Some(Message::with_state(1)));
        channel.task_done();

        tokio::time::timeout(Duration::from_secs(1), endpoint.join())
            .await
            .unwrap();
        assert_eq!(endpoint.pending(), 0);
    }

    #[tokio::test]
    async fn should_treat_zero_capacity_as_one() {
        let (channel, endpoint) = InProcessChannel::pair(0);
        endpoint.publish(Message::with_state(1)).await.unwrap();
        assert_eq!(channel.receive().await, Some(Message::with_state(1)));
    }
}
