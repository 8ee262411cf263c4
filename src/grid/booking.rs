use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::limits::*;
use crate::model::*;

use super::{BookingError, Selection, SlotGrid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Upi,
    Card,
    Online,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
            PaymentMethod::Online => "online",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "upi" => Ok(PaymentMethod::Upi),
            "card" => Ok(PaymentMethod::Card),
            "online" => Ok(PaymentMethod::Online),
            other => Err(BookingError::InvalidPayment(format!("unknown method {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub total: Decimal,
    pub paid: Decimal,
    pub method: PaymentMethod,
}

impl PaymentBreakdown {
    /// Amount still owed at the venue.
    pub fn balance(&self) -> Decimal {
        self.total - self.paid
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: Option<String>,
}

/// A validated manual booking, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualBookingRequest {
    pub service_id: ServiceId,
    pub date: NaiveDate,
    /// In chronological order.
    pub slot_ids: Vec<SlotId>,
    pub customer: Customer,
    pub payment: PaymentBreakdown,
}

/// Admin-entered booking details, waiting for a slot selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub customer: Customer,
    pub paid: Decimal,
    pub method: PaymentMethod,
}

impl BookingDraft {
    pub fn new(customer: Customer, paid: Decimal, method: PaymentMethod) -> Self {
        Self { customer, paid, method }
    }

    /// Validate against the current grid and produce the request. Nothing here touches
    /// the network; an empty selection is rejected first.
    pub fn build(
        &self,
        service_id: ServiceId,
        grid: &SlotGrid,
        selection: &Selection,
    ) -> Result<ManualBookingRequest, BookingError> {
        if selection.is_empty() {
            return Err(BookingError::EmptySelection);
        }
        if selection.len() > MAX_SLOTS_PER_BOOKING {
            return Err(BookingError::LimitExceeded("too many slots in one booking"));
        }
        for &id in selection.ids() {
            match grid.get(id) {
                Some(r) if r.is_available() => {}
                _ => return Err(BookingError::SlotUnavailable(id)),
            }
        }
        if !selection.is_contiguous_in(grid.slots()) {
            return Err(BookingError::NotContiguous);
        }

        let customer = self.validated_customer()?;

        let total = selection.total_price(grid.slots());
        if self.paid.is_sign_negative() {
            return Err(BookingError::InvalidPayment("paid amount is negative".into()));
        }
        if self.paid > total {
            return Err(BookingError::InvalidPayment(format!(
                "paid {} exceeds total {total}",
                self.paid
            )));
        }

        Ok(ManualBookingRequest {
            service_id,
            date: grid.date,
            slot_ids: selection.ids().to_vec(),
            customer,
            payment: PaymentBreakdown {
                total,
                paid: self.paid,
                method: self.method,
            },
        })
    }

    fn validated_customer(&self) -> Result<Customer, BookingError> {
        let name = self.customer.name.trim();
        if name.is_empty() {
            return Err(BookingError::InvalidCustomer("name is required"));
        }
        if name.len() > MAX_CUSTOMER_NAME_LEN {
            return Err(BookingError::LimitExceeded("customer name too long"));
        }
        let phone = match self.customer.phone.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(p) if p.len() > MAX_PHONE_LEN => {
                return Err(BookingError::LimitExceeded("phone number too long"));
            }
            Some(p) => Some(p.to_string()),
        };
        Ok(Customer {
            name: name.to_string(),
            phone,
        })
    }
}
