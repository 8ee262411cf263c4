use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use slotdesk::api::{ApiResult, BookingApi};
use slotdesk::grid::{apply_tap, reconcile_slots, InteriorTapPolicy, ManualBookingRequest, Selection};
use slotdesk::limits::MAX_SLOTS_PER_GRID;
use slotdesk::model::*;
use slotdesk::registry::BoardRegistry;

/// Per-operation timings for one phase.
#[derive(Default)]
struct Latencies(Vec<Duration>);

impl Latencies {
    fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    fn record(&mut self, elapsed: Duration) {
        self.0.push(elapsed);
    }

    fn time<T>(&mut self, op: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = op();
        self.record(started.elapsed());
        out
    }

    fn merge(&mut self, other: Latencies) {
        self.0.extend(other.0);
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    /// Nearest-rank quantile over sorted samples, in microseconds.
    fn quantile_us(sorted: &[Duration], q: f64) -> f64 {
        let Some(last) = sorted.len().checked_sub(1) else {
            return 0.0;
        };
        let rank = ((q * sorted.len() as f64).ceil() as usize).saturating_sub(1).min(last);
        sorted[rank].as_secs_f64() * 1e6
    }

    fn report(mut self, label: &str) {
        if self.0.is_empty() {
            println!("  {label}: no samples");
            return;
        }
        self.0.sort_unstable();
        let mean = self.0.iter().map(Duration::as_secs_f64).sum::<f64>() / self.0.len() as f64 * 1e6;
        let q = |p| Self::quantile_us(&self.0, p);
        println!(
            "  {label}: n={} mean={mean:.1}us p50={:.1}us p95={:.1}us p99={:.1}us max={:.1}us",
            self.0.len(),
            q(0.50),
            q(0.95),
            q(0.99),
            q(1.0),
        );
    }
}

/// A full day of 5-minute slots, in reverse order and mixed time formats.
fn day_of_slots() -> Vec<Slot> {
    (0..MAX_SLOTS_PER_GRID as u32)
        .rev()
        .map(|i| {
            let m = i * 5;
            let start = if i % 2 == 0 {
                format!("{:02}:{:02}", m / 60, m % 60)
            } else {
                let h = (m / 60) % 12;
                let suffix = if m < 720 { "AM" } else { "PM" };
                format!("{}:{:02} {suffix}", if h == 0 { 12 } else { h }, m % 60)
            };
            Slot {
                id: SlotId(i as i64 + 1),
                start_time: start,
                end_time: String::new(),
                price: Decimal::from(100 + i),
                enabled: i % 37 != 0,
            }
        })
        .collect()
}

fn booked_every(n: i64) -> HashSet<SlotId> {
    (1..=MAX_SLOTS_PER_GRID as i64).filter(|i| i % n == 0).map(SlotId).collect()
}

fn phase1_reconcile(slots: &[Slot]) {
    let booked = booked_every(11);
    let disabled = booked_every(29);
    let n = 2000;
    let mut latencies = Latencies::with_capacity(n);
    let start = Instant::now();
    for _ in 0..n {
        let grid = latencies.time(|| reconcile_slots(slots, &booked, &disabled));
        assert_eq!(grid.len(), slots.len());
    }
    let elapsed = start.elapsed();
    println!(
        "  {n} reconciles of {} slots in {:.2}s = {:.0} ops/sec",
        slots.len(),
        elapsed.as_secs_f64(),
        n as f64 / elapsed.as_secs_f64()
    );
    latencies.report("reconcile");
}

fn phase2_taps(slots: &[Slot]) {
    let grid = reconcile_slots(slots, &booked_every(11), &HashSet::new());
    let n = 200_000;
    let mut latencies = Latencies::with_capacity(n);
    let mut selection = Selection::empty();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let mut longest = 0;

    for policy in [InteriorTapPolicy::Restart, InteriorTapPolicy::KeepLarger] {
        for _ in 0..n / 2 {
            let tapped = grid[rng.gen_range(0..grid.len())].id();
            let (next, _) = latencies.time(|| apply_tap(&selection, &grid, tapped, policy));
            longest = longest.max(next.len());
            selection = next;
        }
    }
    println!("  longest selection: {longest} slots");
    latencies.report("apply_tap");
}

struct StaticApi {
    slots: Vec<Slot>,
}

#[async_trait]
impl BookingApi for StaticApi {
    async fn list_services(&self) -> ApiResult<Vec<ServiceInfo>> {
        Ok(Vec::new())
    }

    async fn fetch_slots(&self, _service: ServiceId) -> ApiResult<Vec<Slot>> {
        Ok(self.slots.clone())
    }

    async fn fetch_availability(&self, _service: ServiceId, date: NaiveDate) -> ApiResult<DateAvailability> {
        Ok(DateAvailability::empty(date))
    }

    async fn create_manual_booking(&self, request: &ManualBookingRequest) -> ApiResult<BookingConfirmation> {
        Ok(BookingConfirmation {
            booking_id: request.slot_ids.len() as i64,
            message: None,
        })
    }

    async fn list_bookings(&self, _service: ServiceId, _date: NaiveDate) -> ApiResult<Vec<BookingInfo>> {
        Ok(Vec::new())
    }
}

async fn phase3_concurrent_boards(slots: Vec<Slot>) {
    let registry = Arc::new(BoardRegistry::new(
        Arc::new(StaticApi { slots }),
        InteriorTapPolicy::Restart,
    ));
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let boards = 64;
    let taps_per_board = 2000;

    let start = Instant::now();
    let mut handles = Vec::new();
    for b in 0..boards {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move {
            let board = registry.get_or_create(ServiceId(b)).unwrap();
            board.refresh(date).await.unwrap();
            let mut latencies = Latencies::with_capacity(taps_per_board);
            for i in 0..taps_per_board {
                let slot = SlotId((i as i64 * 7 + b) % MAX_SLOTS_PER_GRID as i64 + 1);
                let started = Instant::now();
                board.tap(slot).await.unwrap();
                latencies.record(started.elapsed());
            }
            latencies
        }));
    }

    let mut all = Latencies::default();
    for h in handles {
        all.merge(h.await.unwrap());
    }
    let elapsed = start.elapsed();
    println!(
        "  {boards} boards x {taps_per_board} taps in {:.2}s = {:.0} taps/sec",
        elapsed.as_secs_f64(),
        all.len() as f64 / elapsed.as_secs_f64()
    );
    all.report("board tap");
}

#[tokio::main]
async fn main() {
    println!("=== slotdesk grid benchmark ===\n");
    let slots = day_of_slots();

    println!("[phase 1] reconcile full-day grid");
    phase1_reconcile(&slots);

    println!("\n[phase 2] random taps on one grid");
    phase2_taps(&slots);

    println!("\n[phase 3] concurrent taps across boards");
    phase3_concurrent_boards(slots).await;
}
