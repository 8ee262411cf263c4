//! Command-line arguments for the `slotdesk` binary.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::grid::{BookingDraft, Customer, PaymentMethod};
use crate::model::{ServiceId, SlotId};

/// Slot board admin client.
///
/// Backend connection is configured through SLOTDESK_API_URL, SLOTDESK_TOKEN,
/// SLOTDESK_TIMEOUT_SECS, SLOTDESK_INTERIOR_TAP and SLOTDESK_METRICS_PORT.
#[derive(Parser, Debug)]
#[command(name = "slotdesk")]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List services
    Services,
    /// Show the slot grid for a service on a date
    Grid {
        #[arg(value_parser = parse_service)]
        service: ServiceId,
        /// Date as YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// List existing bookings for a service on a date
    Bookings {
        #[arg(value_parser = parse_service)]
        service: ServiceId,
        /// Date as YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Tap slots in order, then submit the selection as a manual booking
    Book(BookArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct BookArgs {
    #[arg(value_parser = parse_service)]
    pub service: ServiceId,
    /// Date as YYYY-MM-DD
    #[arg(value_parser = parse_date)]
    pub date: NaiveDate,
    /// Slot ids, tapped in the order given
    #[arg(required = true, value_parser = parse_slot)]
    pub slots: Vec<SlotId>,
    /// Customer name
    #[arg(long)]
    pub name: String,
    /// Customer phone
    #[arg(long)]
    pub phone: Option<String>,
    /// Amount paid now
    #[arg(long, default_value = "0")]
    pub paid: Decimal,
    /// cash, upi, card or online
    #[arg(long, default_value = "cash")]
    pub method: PaymentMethod,
}

impl BookArgs {
    pub fn draft(&self) -> BookingDraft {
        BookingDraft::new(
            Customer {
                name: self.name.clone(),
                phone: self.phone.clone(),
            },
            self.paid,
            self.method,
        )
    }
}

fn parse_service(s: &str) -> Result<ServiceId, String> {
    s.parse().map(ServiceId).map_err(|_| format!("bad service id {s:?}"))
}

fn parse_slot(s: &str) -> Result<SlotId, String> {
    s.parse().map(SlotId).map_err(|_| format!("bad slot id {s:?}"))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| format!("bad date {s:?}, expected YYYY-MM-DD"))
}
