use chrono::NaiveDate;
use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::board::SelectionView;
use crate::model::{ServiceId, SlotId};

const CHANNEL_CAPACITY: usize = 64;

/// What a screen needs to re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BoardEvent {
    GridLoaded {
        service: ServiceId,
        date: NaiveDate,
        slots: usize,
        available: usize,
    },
    SelectionChanged {
        service: ServiceId,
        selection: SelectionView,
    },
    BookingCreated {
        service: ServiceId,
        booking_id: i64,
        slot_ids: Vec<SlotId>,
    },
}

impl BoardEvent {
    pub fn service(&self) -> ServiceId {
        match self {
            BoardEvent::GridLoaded { service, .. }
            | BoardEvent::SelectionChanged { service, .. }
            | BoardEvent::BookingCreated { service, .. } => *service,
        }
    }
}

/// Broadcast hub of board events, one channel per service.
pub struct BoardHub {
    channels: DashMap<ServiceId, broadcast::Sender<BoardEvent>>,
}

impl Default for BoardHub {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardHub {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    /// Subscribe to events for a service. Creates the channel if needed.
    pub fn subscribe(&self, service: ServiceId) -> broadcast::Receiver<BoardEvent> {
        let sender = self
            .channels
            .entry(service)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        sender.subscribe()
    }

    /// Send an event. No-op if nobody is listening.
    pub fn send(&self, event: BoardEvent) {
        if let Some(sender) = self.channels.get(&event.service()) {
            let _ = sender.send(event);
        }
    }

    /// Drop a service's channel (board closed). Subscribers see the stream end.
    pub fn remove(&self, service: &ServiceId) {
        self.channels.remove(service);
    }
}
