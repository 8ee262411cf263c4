use std::collections::HashSet;

use crate::model::*;

// ── Slot State Reconciler ─────────────────────────────────────────

/// Status for one slot on one date.
///
/// Disabled wins over booked: a slot switched off in configuration, or blocked for the
/// date, reports `Disabled` even if a booking also references it.
pub fn slot_status(slot: &Slot, booked: &HashSet<SlotId>, disabled: &HashSet<SlotId>) -> SlotStatus {
    if !slot.enabled || disabled.contains(&slot.id) {
        SlotStatus::Disabled
    } else if booked.contains(&slot.id) {
        SlotStatus::Booked
    } else {
        SlotStatus::Available
    }
}

/// Annotate every configured slot with its status for the date and sort the result
/// ascending by start minute. Equal start minutes keep their input order.
pub fn reconcile_slots(
    slots: &[Slot],
    booked: &HashSet<SlotId>,
    disabled: &HashSet<SlotId>,
) -> Vec<ReconciledSlot> {
    let mut out: Vec<ReconciledSlot> = slots
        .iter()
        .map(|slot| ReconciledSlot {
            status: slot_status(slot, booked, disabled),
            start_minute: slot.start_minute(),
            slot: slot.clone(),
        })
        .collect();
    // sort_by_key is stable
    out.sort_by_key(|r| r.start_minute);
    out
}
