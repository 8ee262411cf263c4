mod error;
#[cfg(test)]
pub(crate) mod fake;
mod http;
pub mod wire;

pub use error::{ApiError, ApiResult};
pub use http::HttpClient;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::grid::ManualBookingRequest;
use crate::model::*;

/// The booking platform as seen by the admin client.
///
/// Implementations translate backend shapes into the model before returning; callers
/// only ever see canonical [`SlotId`]s and [`ServiceId`]s.
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_services(&self) -> ApiResult<Vec<ServiceInfo>>;

    /// Recurring slot configuration for a service.
    async fn fetch_slots(&self, service: ServiceId) -> ApiResult<Vec<Slot>>;

    /// Booked and blocked slot ids for one date.
    async fn fetch_availability(&self, service: ServiceId, date: NaiveDate) -> ApiResult<DateAvailability>;

    async fn create_manual_booking(&self, request: &ManualBookingRequest) -> ApiResult<BookingConfirmation>;

    async fn list_bookings(&self, service: ServiceId, date: NaiveDate) -> ApiResult<Vec<BookingInfo>>;
}
