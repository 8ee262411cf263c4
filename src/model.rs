use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::time::to_minutes;

/// Canonical slot identifier. Backend id shapes are translated into this once, in `api::wire`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub i64);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A bookable service (venue, court, ground).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(pub i64);

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Recurring slot configuration for a service. Times are kept as the backend sent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub start_time: String,
    pub end_time: String,
    pub price: Decimal,
    /// Configuration-level switch; a disabled slot is never available.
    pub enabled: bool,
}

impl Slot {
    pub fn start_minute(&self) -> u32 {
        to_minutes(&self.start_time)
    }

    pub fn end_minute(&self) -> u32 {
        to_minutes(&self.end_time)
    }
}

/// Per-(service, date) overlay of consumed and blocked slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateAvailability {
    pub date: NaiveDate,
    pub booked: HashSet<SlotId>,
    pub disabled: HashSet<SlotId>,
}

impl DateAvailability {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            booked: HashSet::new(),
            disabled: HashSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Booked,
    Disabled,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Disabled => "disabled",
        }
    }
}

/// Slot + computed status for one date. Read-only; recomputed on every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledSlot {
    pub slot: Slot,
    pub status: SlotStatus,
    /// Sort key, minutes since midnight of `slot.start_time`.
    pub start_minute: u32,
}

impl ReconciledSlot {
    pub fn id(&self) -> SlotId {
        self.slot.id
    }

    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}

/// Summary of a service as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub id: ServiceId,
    pub name: String,
    pub location: Option<String>,
    pub active: bool,
}

/// An existing booking for a service on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingInfo {
    pub id: i64,
    pub service_id: ServiceId,
    pub date: NaiveDate,
    pub slot_ids: Vec<SlotId>,
    pub customer_name: Option<String>,
    pub total: Decimal,
    pub paid: Decimal,
    pub status: String,
}

/// Backend acknowledgement of a manual booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub booking_id: i64,
    pub message: Option<String>,
}
