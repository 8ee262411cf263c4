/// Slot configurations larger than this are treated as an invalid response.
pub const MAX_SLOTS_PER_GRID: usize = 288;

/// Max slots a single manual booking may cover.
pub const MAX_SLOTS_PER_BOOKING: usize = 48;

pub const MAX_CUSTOMER_NAME_LEN: usize = 128;

pub const MAX_PHONE_LEN: usize = 32;

/// Max concurrently open slot boards (one per service).
pub const MAX_BOARDS: usize = 256;
