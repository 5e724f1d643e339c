use chrono::{DateTime, Datelike, Local, Utc};

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Full English month name for a 0-based month index.
pub fn month_name(month0: u32) -> &'static str {
    MONTHS[(month0 as usize) % MONTHS.len()]
}

/// 0-based month of the timestamp, as seen on the user's wall clock.
pub fn local_month0(at: DateTime<Utc>) -> u32 {
    let local_dt: DateTime<Local> = DateTime::from(at);
    local_dt.month0()
}
