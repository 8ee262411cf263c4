//! In-memory [`BookingApi`] for board and registry tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::grid::ManualBookingRequest;
use crate::model::*;

use super::{ApiError, ApiResult, BookingApi};

#[derive(Default)]
pub(crate) struct FakeApi {
    pub slots: Mutex<Vec<Slot>>,
    pub overlays: Mutex<HashMap<NaiveDate, DateAvailability>>,
    /// Availability fetches for these dates wait until the gate is notified.
    pub gates: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
    /// Manual booking submissions wait until this gate is notified.
    pub booking_gate: Mutex<Option<Arc<Notify>>>,
    /// Notified when a gated call has started.
    pub entered: Notify,
    pub fail_fetch: Mutex<Option<String>>,
    pub reject_booking: Mutex<Option<String>>,
    pub submitted: Mutex<Vec<ManualBookingRequest>>,
}

impl FakeApi {
    pub fn with_slots(slots: Vec<Slot>) -> Arc<Self> {
        let api = Self::default();
        *api.slots.lock().unwrap() = slots;
        Arc::new(api)
    }

    pub fn set_overlay(&self, overlay: DateAvailability) {
        self.overlays.lock().unwrap().insert(overlay.date, overlay);
    }

    pub fn gate(&self, date: NaiveDate) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(date, gate.clone());
        gate
    }

    pub fn gate_bookings(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.booking_gate.lock().unwrap() = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl BookingApi for FakeApi {
    async fn list_services(&self) -> ApiResult<Vec<ServiceInfo>> {
        Ok(vec![ServiceInfo {
            id: ServiceId(1),
            name: "Court 1".into(),
            location: None,
            active: true,
        }])
    }

    async fn fetch_slots(&self, _service: ServiceId) -> ApiResult<Vec<Slot>> {
        if let Some(msg) = self.fail_fetch.lock().unwrap().clone() {
            return Err(ApiError::Server(msg));
        }
        Ok(self.slots.lock().unwrap().clone())
    }

    async fn fetch_availability(&self, _service: ServiceId, date: NaiveDate) -> ApiResult<DateAvailability> {
        let gate = self.gates.lock().unwrap().get(&date).cloned();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        let overlay = self.overlays.lock().unwrap().get(&date).cloned();
        Ok(overlay.unwrap_or_else(|| DateAvailability::empty(date)))
    }

    async fn create_manual_booking(&self, request: &ManualBookingRequest) -> ApiResult<BookingConfirmation> {
        let gate = self.booking_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        if let Some(msg) = self.reject_booking.lock().unwrap().clone() {
            return Err(ApiError::Rejected(msg));
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(request.clone());
        Ok(BookingConfirmation {
            booking_id: 1000 + submitted.len() as i64,
            message: Some("Booking created".into()),
        })
    }

    async fn list_bookings(&self, service: ServiceId, date: NaiveDate) -> ApiResult<Vec<BookingInfo>> {
        Ok(self
            .submitted
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .filter(|(_, r)| r.service_id == service && r.date == date)
            .map(|(i, r)| BookingInfo {
                id: 1001 + i as i64,
                service_id: r.service_id,
                date: r.date,
                slot_ids: r.slot_ids.clone(),
                customer_name: Some(r.customer.name.clone()),
                total: r.payment.total,
                paid: r.payment.paid,
                status: "confirmed".into(),
            })
            .collect())
    }
}
