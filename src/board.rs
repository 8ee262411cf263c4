use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::{ApiError, BookingApi};
use crate::grid::*;
use crate::model::*;
use crate::notify::{BoardEvent, BoardHub};

#[derive(Debug)]
pub enum BoardError {
    /// Tap or confirm before any grid was loaded.
    NotLoaded(ServiceId),
    /// A newer fetch was issued while this one was in flight; its result was dropped.
    Superseded,
    Booking(BookingError),
    Api(ApiError),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::NotLoaded(id) => write!(f, "no slots loaded for service {id}"),
            BoardError::Superseded => write!(f, "superseded by a newer request"),
            BoardError::Booking(e) => write!(f, "{e}"),
            BoardError::Api(e) => write!(f, "{e}"),
            BoardError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Booking(e) => Some(e),
            BoardError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BookingError> for BoardError {
    fn from(e: BookingError) -> Self {
        BoardError::Booking(e)
    }
}

impl From<ApiError> for BoardError {
    fn from(e: ApiError) -> Self {
        BoardError::Api(e)
    }
}

/// Render-ready snapshot of the current selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionView {
    pub slot_ids: Vec<SlotId>,
    pub total: Decimal,
    /// Outcome of the tap that produced this view, if any.
    pub outcome: Option<TapOutcome>,
}

/// Issued per fetch; only the most recently issued token may apply its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchToken(u64);

#[derive(Debug, Default)]
struct BoardState {
    grid: Option<SlotGrid>,
    selection: Selection,
}

impl BoardState {
    fn view(&self, outcome: Option<TapOutcome>) -> SelectionView {
        let total = match &self.grid {
            Some(grid) => self.selection.total_price(grid.slots()),
            None => Decimal::ZERO,
        };
        SelectionView {
            slot_ids: self.selection.ids().to_vec(),
            total,
            outcome,
        }
    }
}

/// Slot screen for one service: owns the loaded grid and the admin's selection.
pub struct SlotBoard {
    service: ServiceId,
    api: Arc<dyn BookingApi>,
    notify: Arc<BoardHub>,
    policy: InteriorTapPolicy,
    state: RwLock<BoardState>,
    latest_fetch: AtomicU64,
}

impl SlotBoard {
    pub fn new(
        service: ServiceId,
        api: Arc<dyn BookingApi>,
        notify: Arc<BoardHub>,
        policy: InteriorTapPolicy,
    ) -> Self {
        Self {
            service,
            api,
            notify,
            policy,
            state: RwLock::new(BoardState::default()),
            latest_fetch: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> ServiceId {
        self.service
    }

    pub fn policy(&self) -> InteriorTapPolicy {
        self.policy
    }

    // ── Fetching ─────────────────────────────────────────────

    pub fn begin_fetch(&self) -> FetchToken {
        FetchToken(self.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        self.latest_fetch.load(Ordering::SeqCst) == token.0
    }

    /// Install a freshly reconciled grid if `token` is still the latest fetch.
    /// Replacing the grid discards the selection. Returns false for stale tokens.
    pub async fn apply_grid(&self, token: FetchToken, grid: SlotGrid) -> bool {
        let mut state = self.state.write().await;
        if !self.is_current(token) {
            drop(state);
            self.record_stale(token);
            return false;
        }
        let event = BoardEvent::GridLoaded {
            service: self.service,
            date: grid.date,
            slots: grid.len(),
            available: grid.available_count(),
        };
        state.grid = Some(grid);
        state.selection = Selection::empty();
        drop(state);
        self.notify.send(event);
        true
    }

    /// Fetch slot configuration and the date overlay together, reconcile, and install.
    ///
    /// On failure the previous grid stays in place. A response overtaken by a newer
    /// `refresh` is dropped with [`BoardError::Superseded`], whether it succeeded or not.
    pub async fn refresh(&self, date: NaiveDate) -> Result<SlotGrid, BoardError> {
        let token = self.begin_fetch();
        let fetched = futures::try_join!(
            self.api.fetch_slots(self.service),
            self.api.fetch_availability(self.service, date),
        );

        let (slots, overlay) = match fetched {
            Ok(parts) => parts,
            Err(e) if !self.is_current(token) => {
                self.record_stale(token);
                tracing::debug!("stale fetch for service {} failed: {e}", self.service);
                return Err(BoardError::Superseded);
            }
            Err(e) => {
                warn!("fetching slots for service {} on {date} failed: {e}", self.service);
                return Err(e.into());
            }
        };

        let grid = SlotGrid::from_parts(&slots, &overlay);
        if !self.apply_grid(token, grid.clone()).await {
            return Err(BoardError::Superseded);
        }
        info!(
            "service {} on {date}: {} slots, {} available",
            self.service,
            grid.len(),
            grid.available_count()
        );
        Ok(grid)
    }

    fn record_stale(&self, token: FetchToken) {
        metrics::counter!(crate::observability::STALE_RESPONSES_TOTAL).increment(1);
        warn!(
            "dropping stale response for service {} (token {}, latest {})",
            self.service,
            token.0,
            self.latest_fetch.load(Ordering::SeqCst)
        );
    }

    pub async fn grid(&self) -> Option<SlotGrid> {
        self.state.read().await.grid.clone()
    }

    // ── Selection ────────────────────────────────────────────

    pub async fn selection(&self) -> SelectionView {
        self.state.read().await.view(None)
    }

    /// Apply one tap through the range selector.
    pub async fn tap(&self, slot: SlotId) -> Result<SelectionView, BoardError> {
        let mut state = self.state.write().await;
        let Some(grid) = &state.grid else {
            return Err(BoardError::NotLoaded(self.service));
        };
        let (selection, outcome) = apply_tap(&state.selection, grid.slots(), slot, self.policy);
        state.selection = selection;
        let view = state.view(Some(outcome));
        drop(state);

        metrics::counter!(crate::observability::SELECTION_TAPS_TOTAL, "outcome" => outcome.as_str())
            .increment(1);
        if outcome != TapOutcome::Ignored {
            self.notify.send(BoardEvent::SelectionChanged {
                service: self.service,
                selection: view.clone(),
            });
        }
        Ok(view)
    }

    /// Discard the selection (booking modal closed).
    pub async fn clear(&self) -> SelectionView {
        let mut state = self.state.write().await;
        let changed = !state.selection.is_empty();
        state.selection = Selection::empty();
        let view = state.view(None);
        drop(state);
        if changed {
            self.notify.send(BoardEvent::SelectionChanged {
                service: self.service,
                selection: view.clone(),
            });
        }
        view
    }

    // ── Booking ──────────────────────────────────────────────

    /// Validate the selection locally, then submit it. No retry: a backend rejection
    /// is returned as-is and the board is left untouched for the admin to refresh.
    /// On success the selection is cleared only if it is still the one submitted.
    pub async fn confirm(&self, draft: &BookingDraft) -> Result<BookingConfirmation, BoardError> {
        let request = {
            let state = self.state.read().await;
            let grid = state.grid.as_ref().ok_or(BoardError::NotLoaded(self.service))?;
            draft.build(self.service, grid, &state.selection)?
        };

        match self.api.create_manual_booking(&request).await {
            Ok(confirmation) => {
                metrics::counter!(crate::observability::BOOKINGS_SUBMITTED_TOTAL, "status" => "ok")
                    .increment(1);
                info!(
                    "booking {} created for service {} on {} ({} slots, total {})",
                    confirmation.booking_id,
                    self.service,
                    request.date,
                    request.slot_ids.len(),
                    request.payment.total
                );
                {
                    let mut state = self.state.write().await;
                    // leave a selection changed while the request was in flight
                    if state.selection.ids() == request.slot_ids.as_slice() {
                        state.selection = Selection::empty();
                    }
                }
                self.notify.send(BoardEvent::BookingCreated {
                    service: self.service,
                    booking_id: confirmation.booking_id,
                    slot_ids: request.slot_ids,
                });
                Ok(confirmation)
            }
            Err(e) => {
                metrics::counter!(crate::observability::BOOKINGS_SUBMITTED_TOTAL, "status" => e.kind())
                    .increment(1);
                warn!("booking for service {} on {} rejected: {e}", self.service, request.date);
                Err(e.into())
            }
        }
    }

    pub async fn bookings(&self, date: NaiveDate) -> Result<Vec<BookingInfo>, BoardError> {
        Ok(self.api.list_bookings(self.service, date).await?)
    }
}
