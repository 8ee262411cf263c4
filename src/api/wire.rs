//! Backend JSON shapes and their one-time translation into the model.
//!
//! The backend is inconsistent about field names (`id` / `slotId` / `slot_id`) and id
//! types (number or numeric string). Everything is normalised here; nothing past
//! `into_model` sees a raw backend id.

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::grid::ManualBookingRequest;
use crate::limits::MAX_SLOTS_PER_GRID;
use crate::model::*;

use super::ApiError;

/// `{ success, data, message }` wrapper every endpoint responds with.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.success == Some(false) {
            return Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "request failed".into()),
            ));
        }
        self.data
            .ok_or_else(|| ApiError::InvalidResponse("missing data".into()))
    }
}

/// Integer id sent as a JSON number or a numeric string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexId(pub i64);

impl<'de> Deserialize<'de> for FlexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Float(f64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(FlexId(n)),
            Raw::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(FlexId(f as i64)),
            Raw::Float(f) => Err(de::Error::custom(format!("non-integer id {f}"))),
            Raw::Str(s) => s
                .trim()
                .parse()
                .map(FlexId)
                .map_err(|_| de::Error::custom(format!("non-numeric id {s:?}"))),
        }
    }
}

fn default_true() -> bool {
    true
}

fn pick_id(candidates: &[Option<FlexId>], what: &str) -> Result<i64, ApiError> {
    candidates
        .iter()
        .flatten()
        .next()
        .map(|id| id.0)
        .ok_or_else(|| ApiError::InvalidResponse(format!("{what} without id")))
}

// ── Slots ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSlot {
    #[serde(default, alias = "slot_id")]
    pub slot_id: Option<FlexId>,
    #[serde(default)]
    pub id: Option<FlexId>,
    #[serde(alias = "start_time")]
    pub start_time: String,
    #[serde(default, alias = "end_time")]
    pub end_time: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default = "default_true", alias = "isActive", alias = "is_active")]
    pub enabled: bool,
}

impl WireSlot {
    pub fn into_model(self) -> Result<Slot, ApiError> {
        let id = pick_id(&[self.slot_id, self.id], "slot")?;
        if self.price.is_sign_negative() && !self.price.is_zero() {
            return Err(ApiError::InvalidResponse(format!("slot {id} has negative price")));
        }
        Ok(Slot {
            id: SlotId(id),
            start_time: self.start_time,
            end_time: self.end_time,
            price: self.price,
            enabled: self.enabled,
        })
    }
}

pub fn slots_into_model(wire: Vec<WireSlot>) -> Result<Vec<Slot>, ApiError> {
    if wire.len() > MAX_SLOTS_PER_GRID {
        return Err(ApiError::InvalidResponse(format!(
            "{} slots exceeds limit {MAX_SLOTS_PER_GRID}",
            wire.len()
        )));
    }
    let mut seen = HashSet::with_capacity(wire.len());
    let mut slots = Vec::with_capacity(wire.len());
    for w in wire {
        let slot = w.into_model()?;
        if !seen.insert(slot.id) {
            return Err(ApiError::InvalidResponse(format!("duplicate slot id {}", slot.id)));
        }
        slots.push(slot);
    }
    Ok(slots)
}

// ── Date availability ────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAvailability {
    #[serde(default, alias = "booked_slot_ids", alias = "booked")]
    pub booked_slot_ids: Vec<FlexId>,
    #[serde(default, alias = "disabled_slot_ids", alias = "disabled")]
    pub disabled_slot_ids: Vec<FlexId>,
}

impl WireAvailability {
    pub fn into_model(self, date: NaiveDate) -> DateAvailability {
        DateAvailability {
            date,
            booked: self.booked_slot_ids.into_iter().map(|id| SlotId(id.0)).collect(),
            disabled: self.disabled_slot_ids.into_iter().map(|id| SlotId(id.0)).collect(),
        }
    }
}

// ── Services ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireService {
    #[serde(default, alias = "service_id")]
    pub service_id: Option<FlexId>,
    #[serde(default)]
    pub id: Option<FlexId>,
    #[serde(alias = "serviceName", alias = "service_name")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_true", alias = "isActive", alias = "is_active")]
    pub active: bool,
}

impl WireService {
    pub fn into_model(self) -> Result<ServiceInfo, ApiError> {
        let id = pick_id(&[self.service_id, self.id], "service")?;
        Ok(ServiceInfo {
            id: ServiceId(id),
            name: self.name,
            location: self.location,
            active: self.active,
        })
    }
}

// ── Bookings ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBooking {
    #[serde(default, alias = "booking_id")]
    pub booking_id: Option<FlexId>,
    #[serde(default)]
    pub id: Option<FlexId>,
    #[serde(alias = "service_id")]
    pub service_id: FlexId,
    /// `YYYY-MM-DD`, or a full timestamp whose date part is used.
    pub date: String,
    #[serde(default, alias = "slot_ids")]
    pub slot_ids: Vec<FlexId>,
    #[serde(default, alias = "customer_name")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "total_amount", alias = "total")]
    pub total_amount: Decimal,
    #[serde(default, alias = "paid_amount", alias = "paid")]
    pub paid_amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
}

impl WireBooking {
    pub fn into_model(self) -> Result<BookingInfo, ApiError> {
        let id = pick_id(&[self.booking_id, self.id], "booking")?;
        let date = parse_wire_date(&self.date)
            .ok_or_else(|| ApiError::InvalidResponse(format!("booking {id} has bad date {:?}", self.date)))?;
        Ok(BookingInfo {
            id,
            service_id: ServiceId(self.service_id.0),
            date,
            slot_ids: self.slot_ids.into_iter().map(|s| SlotId(s.0)).collect(),
            customer_name: self.customer_name,
            total: self.total_amount,
            paid: self.paid_amount,
            status: self.status.unwrap_or_else(|| "confirmed".into()),
        })
    }
}

fn parse_wire_date(s: &str) -> Option<NaiveDate> {
    let head = s.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireBookingCreated {
    #[serde(default, alias = "booking_id")]
    pub booking_id: Option<FlexId>,
    #[serde(default)]
    pub id: Option<FlexId>,
}

impl WireBookingCreated {
    pub fn into_model(self, message: Option<String>) -> Result<BookingConfirmation, ApiError> {
        let booking_id = pick_id(&[self.booking_id, self.id], "created booking")?;
        Ok(BookingConfirmation { booking_id, message })
    }
}

/// POST body for a manual booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    pub service_id: i64,
    pub date: String,
    pub slot_ids: Vec<i64>,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub paid_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance_amount: Decimal,
    pub payment_method: &'static str,
    pub booking_type: &'static str,
}

impl From<&ManualBookingRequest> for CreateBookingBody {
    fn from(req: &ManualBookingRequest) -> Self {
        Self {
            service_id: req.service_id.0,
            date: req.date.format("%Y-%m-%d").to_string(),
            slot_ids: req.slot_ids.iter().map(|s| s.0).collect(),
            customer_name: req.customer.name.clone(),
            customer_phone: req.customer.phone.clone(),
            total_amount: req.payment.total,
            paid_amount: req.payment.paid,
            balance_amount: req.payment.balance(),
            payment_method: req.payment.method.as_str(),
            booking_type: "manual",
        }
    }
}
