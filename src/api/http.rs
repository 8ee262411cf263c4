//! reqwest-backed implementation of [`BookingApi`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::grid::ManualBookingRequest;
use crate::model::*;

use super::wire::{self, Envelope};
use super::{ApiError, ApiResult, BookingApi};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<Envelope<T>> {
        let request = self.authorize(self.client.get(self.url(path)).query(query));
        self.send(endpoint, request).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &B,
    ) -> ApiResult<Envelope<T>> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        self.send(endpoint, request).await
    }

    /// Send, record metrics, map status codes. No retries.
    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ApiResult<Envelope<T>> {
        let started = Instant::now();
        let result = match request.send().await {
            Ok(response) => Self::handle_response(response).await,
            Err(e) => Err(ApiError::from(e)),
        };
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        debug!("{endpoint}: {status} in {:?}", started.elapsed());
        metrics::counter!(crate::observability::API_REQUESTS_TOTAL, "endpoint" => endpoint, "status" => status)
            .increment(1);
        metrics::histogram!(crate::observability::API_REQUEST_DURATION_SECONDS, "endpoint" => endpoint)
            .record(started.elapsed().as_secs_f64());
        result
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<Envelope<T>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text);
            return Err(match status {
                StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
                StatusCode::FORBIDDEN => ApiError::Forbidden(message),
                StatusCode::NOT_FOUND => ApiError::NotFound(message),
                s if s.is_client_error() => ApiError::Rejected(message),
                _ => ApiError::Server(message),
            });
        }

        serde_json::from_str(&text).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

/// Prefer the backend's `message` field; fall back to the raw body.
fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: Option<String>,
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl BookingApi for HttpClient {
    async fn list_services(&self) -> ApiResult<Vec<ServiceInfo>> {
        self.get::<Vec<wire::WireService>>("list_services", "api/admin/services", &[])
            .await?
            .into_data()?
            .into_iter()
            .map(wire::WireService::into_model)
            .collect()
    }

    async fn fetch_slots(&self, service: ServiceId) -> ApiResult<Vec<Slot>> {
        let path = format!("api/admin/services/{service}/slots");
        let wire = self
            .get::<Vec<wire::WireSlot>>("fetch_slots", &path, &[])
            .await?
            .into_data()?;
        wire::slots_into_model(wire)
    }

    async fn fetch_availability(&self, service: ServiceId, date: NaiveDate) -> ApiResult<DateAvailability> {
        let path = format!("api/admin/services/{service}/availability");
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        let wire = self
            .get::<wire::WireAvailability>("fetch_availability", &path, &query)
            .await?
            .into_data()?;
        Ok(wire.into_model(date))
    }

    async fn create_manual_booking(&self, request: &ManualBookingRequest) -> ApiResult<BookingConfirmation> {
        let body = wire::CreateBookingBody::from(request);
        let envelope = self
            .post::<wire::WireBookingCreated, _>("create_manual_booking", "api/admin/bookings/manual", &body)
            .await?;
        let message = envelope.message.clone();
        envelope.into_data()?.into_model(message)
    }

    async fn list_bookings(&self, service: ServiceId, date: NaiveDate) -> ApiResult<Vec<BookingInfo>> {
        let path = format!("api/admin/services/{service}/bookings");
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        self.get::<Vec<wire::WireBooking>>("list_bookings", &path, &query)
            .await?
            .into_data()?
            .into_iter()
            .map(wire::WireBooking::into_model)
            .collect()
    }
}
