// Display helpers for CLI output.

use chrono::{DateTime, Datelike, Utc};

/// "Mar 4" within the current year, "04/03/23" (dd/mm/yy) otherwise.
pub fn smart_date(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if date.year() == now.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%d/%m/%y").to_string()
    }
}

/// Signed percentage such as "+40%" or "-12%".
pub fn signed_percent(value: i64) -> String {
    if value > 0 {
        format!("+{}%", value)
    } else {
        format!("{}%", value)
    }
}
