use chrono::{DateTime, NaiveDateTime, Timelike};

/// Minutes in a day; valid results are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Minutes since midnight for a slot time string.
///
/// Accepts 12-hour times with an AM/PM marker (`"9:30 AM"`), `HH:mm`, `HH:mm:ss`
/// and ISO-8601 timestamps. Anything unparseable sorts as midnight (`0`).
pub fn to_minutes(s: &str) -> u32 {
    match parse_minutes(s) {
        Some(m) => m,
        None => {
            tracing::debug!("unparseable slot time {s:?}, sorting as 00:00");
            0
        }
    }
}

/// Strict variant of [`to_minutes`]: `None` instead of the midnight fallback.
pub fn parse_minutes(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Some((clock, pm)) = split_meridiem(s) {
        return parse_twelve_hour(clock, pm);
    }
    if looks_like_timestamp(s) {
        return parse_timestamp(s);
    }
    parse_clock(s)
}

/// Render minutes since midnight as `HH:MM`.
pub fn format_minutes(minutes: u32) -> String {
    let m = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Strip a trailing AM/PM marker (any case, optional dots). Returns the clock part
/// and whether the marker was PM.
fn split_meridiem(s: &str) -> Option<(&str, bool)> {
    let trimmed = s.trim_end_matches('.');
    let len = trimmed.len();
    if len < 2 || !trimmed.is_char_boundary(len - 2) {
        return None;
    }
    let (head, tail) = trimmed.split_at(len - 2);
    let pm = match tail.to_ascii_lowercase().as_str() {
        "am" => false,
        "pm" => true,
        // "a.m." / "p.m." → after trimming the final dot the tail is ".m"
        ".m" => {
            let head = head.trim_end();
            if let Some(clock) = head.strip_suffix(['a', 'A']) {
                return Some((clock.trim_end(), false));
            }
            return head.strip_suffix(['p', 'P']).map(|clock| (clock.trim_end(), true));
        }
        _ => return None,
    };
    Some((head.trim_end(), pm))
}

fn parse_twelve_hour(clock: &str, pm: bool) -> Option<u32> {
    let mut parts = clock.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = match parts.next() {
        Some(m) => m.trim().parse().ok()?,
        None => 0,
    };
    if hour > 12 || minute > 59 {
        return None;
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    };
    Some(hour * 60 + minute)
}

fn looks_like_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 16 && bytes[4] == b'-' && bytes[7] == b'-' && matches!(bytes[10], b'T' | b' ')
}

/// Wall-clock time of day as written; the offset is not converted.
fn parse_timestamp(s: &str) -> Option<u32> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        let t = dt.naive_local().time();
        return Some(t.hour() * 60 + t.minute());
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.time().hour() * 60 + dt.time().minute())
}

fn parse_clock(s: &str) -> Option<u32> {
    let mut parts = s.split(':');
    let hour: u32 = parts.next()?.trim().parse().ok()?;
    let minute: u32 = parts.next()?.trim().parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}
