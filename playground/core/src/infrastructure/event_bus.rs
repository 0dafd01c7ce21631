// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
// Event Bus - Pub/Sub for Playground Events
//
// In-memory fan-out over a tokio broadcast channel. Events are lost when no
// subscriber is listening; slow subscribers observe `Lagged`.

use crate::domain::events::{PlaygroundEvent, RequestChannel};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<PlaygroundEvent>>,
}

impl EventBus {
    /// Capacity bounds how many events are buffered per subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(256)
    }

    pub fn publish(&self, event: PlaygroundEvent) {
        debug!("Publishing event: {:?}", event);
        if self.sender.send(event).is_err() {
            debug!("No subscribers listening to event");
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Subscribe to the events of one request channel only
    pub fn subscribe_channel(&self, channel: RequestChannel) -> ChannelEventReceiver {
        ChannelEventReceiver {
            receiver: self.sender.subscribe(),
            channel,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

fn map_recv_error(e: broadcast::error::RecvError) -> EventBusError {
    match e {
        broadcast::error::RecvError::Closed => EventBusError::Closed,
        broadcast::error::RecvError::Lagged(n) => {
            warn!("Event receiver lagged by {} events", n);
            EventBusError::Lagged(n)
        }
    }
}

pub struct EventReceiver {
    receiver: broadcast::Receiver<PlaygroundEvent>,
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Result<PlaygroundEvent, EventBusError> {
        self.receiver.recv().await.map_err(map_recv_error)
    }

    pub fn try_recv(&mut self) -> Result<PlaygroundEvent, EventBusError> {
        self.receiver.try_recv().map_err(|e| match e {
            broadcast::error::TryRecvError::Empty => EventBusError::Empty,
            broadcast::error::TryRecvError::Closed => EventBusError::Closed,
            broadcast::error::TryRecvError::Lagged(n) => {
                warn!("Event receiver lagged by {} events", n);
                EventBusError::Lagged(n)
            }
        })
    }

    /// Drains everything currently buffered without waiting
    pub fn drain(&mut self) -> Vec<PlaygroundEvent> {
        let mut events = Vec::new();
        loop {
            match self.try_recv() {
                Ok(event) => events.push(event),
                Err(EventBusError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        events
    }
}

pub struct ChannelEventReceiver {
    receiver: broadcast::Receiver<PlaygroundEvent>,
    channel: RequestChannel,
}

impl ChannelEventReceiver {
    pub async fn recv(&mut self) -> Result<PlaygroundEvent, EventBusError> {
        loop {
            let event = self.receiver.recv().await.map_err(map_recv_error)?;
            if event_channel(&event) == self.channel {
                return Ok(event);
            }
        }
    }
}

fn event_channel(event: &PlaygroundEvent) -> RequestChannel {
    match event {
        PlaygroundEvent::ExecutionStarted { .. }
        | PlaygroundEvent::ExecutionCompleted { .. }
        | PlaygroundEvent::ExecutionFailed { .. } => RequestChannel::Execution,
        PlaygroundEvent::ValidationCompleted { .. } => RequestChannel::Validation,
        PlaygroundEvent::StaleResultDiscarded { channel, .. } => *channel,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventBusError {
    #[error("Event bus is closed")]
    Closed,

    #[error("No events available")]
    Empty,

    #[error("Receiver lagged by {0} events (events were dropped)")]
    Lagged(u64),
}
