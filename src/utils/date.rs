use chrono::{Local, NaiveDate, Timelike, Utc};

pub const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn current_hour() -> u32 {
    Local::now().hour()
}

/// Milliseconds since the epoch, used for `createdAt` stamps.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Time inputs used by state changes; fixed in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub today: NaiveDate,
    pub hour: u32,
    pub now_ms: i64,
}

impl Clock {
    pub fn now() -> Self {
        Self {
            today: today(),
            hour: current_hour(),
            now_ms: now_millis(),
        }
    }
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), ISO_FORMAT).ok()
}

/// Parse the free-form dates older exports carry (`10/18/2026`, `2026-10-18`, `18.10.2026`).
pub fn parse_loose_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    ["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

pub fn to_iso(d: NaiveDate) -> String {
    d.format(ISO_FORMAT).to_string()
}

/// Short human date, e.g. `10/18/2026`.
pub fn to_display(d: NaiveDate) -> String {
    d.format("%-m/%-d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_dates_accept_common_layouts() {
        let d = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(parse_loose_date("3/7/2026"), Some(d));
        assert_eq!(parse_loose_date("2026-03-07"), Some(d));
        assert_eq!(parse_loose_date("07.03.2026"), Some(d));
        assert_eq!(parse_loose_date("someday"), None);
        assert_eq!(to_display(d), "3/7/2026");
    }
}
