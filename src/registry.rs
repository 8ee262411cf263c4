use std::sync::Arc;

use dashmap::DashMap;

use crate::api::BookingApi;
use crate::board::{BoardError, SlotBoard};
use crate::grid::InteriorTapPolicy;
use crate::limits::*;
use crate::model::ServiceId;
use crate::notify::BoardHub;

/// Open slot boards, one per service, sharing one API client and one event hub.
pub struct BoardRegistry {
    boards: DashMap<ServiceId, Arc<SlotBoard>>,
    api: Arc<dyn BookingApi>,
    notify: Arc<BoardHub>,
    policy: InteriorTapPolicy,
}

impl BoardRegistry {
    pub fn new(api: Arc<dyn BookingApi>, policy: InteriorTapPolicy) -> Self {
        Self {
            boards: DashMap::new(),
            api,
            notify: Arc::new(BoardHub::new()),
            policy,
        }
    }

    pub fn notify(&self) -> Arc<BoardHub> {
        self.notify.clone()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    /// Get or lazily open the board for a service.
    pub fn get_or_create(&self, service: ServiceId) -> Result<Arc<SlotBoard>, BoardError> {
        if let Some(board) = self.boards.get(&service) {
            return Ok(board.value().clone());
        }
        if self.boards.len() >= MAX_BOARDS {
            return Err(BoardError::LimitExceeded("too many open boards"));
        }

        let board = self
            .boards
            .entry(service)
            .or_insert_with(|| {
                Arc::new(SlotBoard::new(
                    service,
                    self.api.clone(),
                    self.notify.clone(),
                    self.policy,
                ))
            })
            .value()
            .clone();
        metrics::gauge!(crate::observability::BOARDS_ACTIVE).set(self.boards.len() as f64);
        Ok(board)
    }

    /// Close a service's board and end its event stream. Returns false if it wasn't open.
    pub fn close(&self, service: ServiceId) -> bool {
        let removed = self.boards.remove(&service).is_some();
        if removed {
            self.notify.remove(&service);
            metrics::gauge!(crate::observability::BOARDS_ACTIVE).set(self.boards.len() as f64);
        }
        removed
    }
}
