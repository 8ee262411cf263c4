mod booking;
mod error;
mod reconcile;
mod selection;

pub use booking::{BookingDraft, Customer, ManualBookingRequest, PaymentBreakdown, PaymentMethod};
pub use error::BookingError;
pub use reconcile::{reconcile_slots, slot_status};
pub use selection::{apply_tap, select_slot, InteriorTapPolicy, Selection, SelectionState, TapOutcome};

use std::ops::RangeInclusive;

use chrono::NaiveDate;

use crate::model::*;

/// The reconciled, chronologically sorted slot list for one service on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGrid {
    pub date: NaiveDate,
    slots: Vec<ReconciledSlot>,
}

impl SlotGrid {
    /// Wrap an already reconciled list. Re-sorts (stable) so callers can't break ordering.
    pub fn new(date: NaiveDate, mut slots: Vec<ReconciledSlot>) -> Self {
        slots.sort_by_key(|r| r.start_minute);
        Self { date, slots }
    }

    /// Reconcile slot configuration against the date overlay.
    pub fn from_parts(slots: &[Slot], overlay: &DateAvailability) -> Self {
        Self {
            date: overlay.date,
            slots: reconcile_slots(slots, &overlay.booked, &overlay.disabled),
        }
    }

    pub fn slots(&self) -> &[ReconciledSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn position(&self, id: SlotId) -> Option<usize> {
        position(&self.slots, id)
    }

    pub fn get(&self, id: SlotId) -> Option<&ReconciledSlot> {
        self.slots.iter().find(|r| r.id() == id)
    }

    pub fn available_count(&self) -> usize {
        self.slots.iter().filter(|r| r.is_available()).count()
    }

    /// True if every slot in the index range is available. Out-of-bounds ranges are not.
    pub fn run_is_available(&self, range: RangeInclusive<usize>) -> bool {
        run_is_available(&self.slots, range)
    }
}

pub(crate) fn position(slots: &[ReconciledSlot], id: SlotId) -> Option<usize> {
    slots.iter().position(|r| r.id() == id)
}

pub(crate) fn run_is_available(slots: &[ReconciledSlot], range: RangeInclusive<usize>) -> bool {
    match slots.get(range) {
        Some(run) => run.iter().all(ReconciledSlot::is_available),
        None => false,
    }
}
