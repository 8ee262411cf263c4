use crate::model::SlotId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    EmptySelection,
    SlotUnavailable(SlotId),
    NotContiguous,
    InvalidPayment(String),
    InvalidCustomer(&'static str),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::EmptySelection => write!(f, "select at least one slot before booking"),
            BookingError::SlotUnavailable(id) => write!(f, "slot {id} is not available"),
            BookingError::NotContiguous => write!(f, "selected slots are not one contiguous run"),
            BookingError::InvalidPayment(msg) => write!(f, "invalid payment: {msg}"),
            BookingError::InvalidCustomer(msg) => write!(f, "invalid customer: {msg}"),
            BookingError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for BookingError {}
