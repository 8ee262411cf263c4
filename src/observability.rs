use std::net::SocketAddr;

// ── API metrics (request-driven) ────────────────────────────────

/// Counter: backend requests. Labels: endpoint, status.
pub const API_REQUESTS_TOTAL: &str = "slotdesk_api_requests_total";

/// Histogram: backend request latency in seconds. Labels: endpoint.
pub const API_REQUEST_DURATION_SECONDS: &str = "slotdesk_api_request_duration_seconds";

/// Counter: fetch responses dropped because a newer fetch was issued.
pub const STALE_RESPONSES_TOTAL: &str = "slotdesk_stale_responses_total";

// ── Board metrics ───────────────────────────────────────────────

/// Counter: slot taps. Labels: outcome.
pub const SELECTION_TAPS_TOTAL: &str = "slotdesk_selection_taps_total";

/// Counter: manual booking submissions. Labels: status.
pub const BOOKINGS_SUBMITTED_TOTAL: &str = "slotdesk_bookings_submitted_total";

/// Gauge: open slot boards.
pub const BOARDS_ACTIVE: &str = "slotdesk_boards_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}
