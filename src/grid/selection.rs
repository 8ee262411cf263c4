use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::*;

use super::{position, run_is_available};

// ── Contiguous Range Selector ─────────────────────────────────────

/// Slots chosen for one manual booking, kept in grid (chronological) order.
///
/// Invariant: empty, or a contiguous run of the grid whose members are all available.
/// Only [`apply_tap`] builds multi-slot selections, and it upholds the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<SlotId>,
}

/// Cardinality view of a selection. There is no other hidden state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    Single,
    Range,
}

/// What to do when the admin taps a slot strictly inside the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteriorTapPolicy {
    /// Restart the run at the tapped slot.
    #[default]
    Restart,
    /// Drop the tapped slot and keep the larger remaining side (earlier side on a tie).
    KeepLarger,
}

impl std::str::FromStr for InteriorTapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "restart" => Ok(InteriorTapPolicy::Restart),
            "keep-larger" | "keep_larger" => Ok(InteriorTapPolicy::KeepLarger),
            other => Err(format!("unknown interior tap policy: {other}")),
        }
    }
}

/// How a tap changed the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TapOutcome {
    /// Empty → single.
    Started,
    /// Grew to a longer contiguous run.
    Extended,
    /// Lost an edge slot.
    Shrunk,
    /// Interior tap under `KeepLarger`.
    Split,
    /// Last member tapped off.
    Cleared,
    /// Reset to the tapped slot (interior tap, or blocked/discontinuous extension).
    Restarted,
    /// Tapped slot unknown or not available; selection unchanged.
    Ignored,
}

impl TapOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TapOutcome::Started => "started",
            TapOutcome::Extended => "extended",
            TapOutcome::Shrunk => "shrunk",
            TapOutcome::Split => "split",
            TapOutcome::Cleared => "cleared",
            TapOutcome::Restarted => "restarted",
            TapOutcome::Ignored => "ignored",
        }
    }
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    fn single(id: SlotId) -> Self {
        Self { ids: vec![id] }
    }

    pub fn ids(&self) -> &[SlotId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.ids.contains(&id)
    }

    pub fn first(&self) -> Option<SlotId> {
        self.ids.first().copied()
    }

    pub fn last(&self) -> Option<SlotId> {
        self.ids.last().copied()
    }

    pub fn state(&self) -> SelectionState {
        match self.ids.len() {
            0 => SelectionState::Empty,
            1 => SelectionState::Single,
            _ => SelectionState::Range,
        }
    }

    /// Sum of member prices. Ids missing from `slots` contribute nothing.
    pub fn total_price(&self, slots: &[ReconciledSlot]) -> Decimal {
        slots
            .iter()
            .filter(|r| self.contains(r.id()))
            .map(|r| r.slot.price)
            .sum()
    }

    /// True if the selection is empty, or a contiguous run of available slots in `slots`
    /// listed in grid order.
    pub fn is_contiguous_in(&self, slots: &[ReconciledSlot]) -> bool {
        let Some(first) = self.first() else {
            return true;
        };
        let Some(start) = position(slots, first) else {
            return false;
        };
        let end = start + self.ids.len() - 1;
        let Some(run) = slots.get(start..=end) else {
            return false;
        };
        run.iter()
            .zip(&self.ids)
            .all(|(r, id)| r.id() == *id && r.is_available())
    }
}

/// Apply one tap with the default [`InteriorTapPolicy::Restart`].
pub fn select_slot(selection: &Selection, slots: &[ReconciledSlot], tapped: SlotId) -> Selection {
    apply_tap(selection, slots, tapped, InteriorTapPolicy::Restart).0
}

/// Pure reducer: `(selection, tap) → (selection, outcome)`.
///
/// `slots` must be the reconciled, chronologically sorted list for the date.
pub fn apply_tap(
    selection: &Selection,
    slots: &[ReconciledSlot],
    tapped: SlotId,
    policy: InteriorTapPolicy,
) -> (Selection, TapOutcome) {
    let Some(tapped_idx) = position(slots, tapped) else {
        return (selection.clone(), TapOutcome::Ignored);
    };
    if !slots[tapped_idx].is_available() {
        return (selection.clone(), TapOutcome::Ignored);
    }

    let (Some(first), Some(last)) = (selection.first(), selection.last()) else {
        return (Selection::single(tapped), TapOutcome::Started);
    };

    if let Some(member_idx) = selection.ids.iter().position(|id| *id == tapped) {
        return tap_member(selection, member_idx, policy);
    }

    // A selection that no longer lines up with the grid can't be extended.
    let (Some(first_idx), Some(last_idx)) = (position(slots, first), position(slots, last)) else {
        return (Selection::single(tapped), TapOutcome::Restarted);
    };

    let range = if tapped_idx < first_idx {
        tapped_idx..=last_idx
    } else if tapped_idx > last_idx {
        first_idx..=tapped_idx
    } else {
        // Between the edges but not a member: only reachable with a broken selection.
        return (Selection::single(tapped), TapOutcome::Restarted);
    };

    if !run_is_available(slots, range.clone()) {
        return (Selection::single(tapped), TapOutcome::Restarted);
    }

    let ids = slots[range].iter().map(ReconciledSlot::id).collect();
    (Selection { ids }, TapOutcome::Extended)
}

fn tap_member(selection: &Selection, member_idx: usize, policy: InteriorTapPolicy) -> (Selection, TapOutcome) {
    let ids = &selection.ids;
    if ids.len() == 1 {
        return (Selection::empty(), TapOutcome::Cleared);
    }
    if member_idx == 0 {
        return (Selection { ids: ids[1..].to_vec() }, TapOutcome::Shrunk);
    }
    if member_idx == ids.len() - 1 {
        return (Selection { ids: ids[..member_idx].to_vec() }, TapOutcome::Shrunk);
    }
    match policy {
        InteriorTapPolicy::Restart => (Selection::single(ids[member_idx]), TapOutcome::Restarted),
        InteriorTapPolicy::KeepLarger => {
            let before = &ids[..member_idx];
            let after = &ids[member_idx + 1..];
            let kept = if before.len() >= after.len() { before } else { after };
            (Selection { ids: kept.to_vec() }, TapOutcome::Split)
        }
    }
}
