// Derived metrics.
// Pure arithmetic over fetched data, kept apart from the network fan-out.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

/// Commit counts for the trailing week and the week before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitWindows {
    pub this_week: u64,
    pub last_week: u64,
}

/// Rough size estimate: total language bytes in thousands, one decimal place.
pub fn lines_of_code(languages: &BTreeMap<String, u64>) -> f64 {
    let total: u64 = languages.values().sum();
    round_tenths(total as f64 / 1000.0)
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Bucket authored timestamps into `[now - 7d, ..)` and `[now - 14d, now - 7d)`.
///
/// Timestamps after `now` land in the current week. Anything older than 14
/// days is ignored.
pub fn commit_windows<I>(authored: I, now: DateTime<Utc>) -> CommitWindows
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let week_ago = now - TimeDelta::days(7);
    let two_weeks_ago = now - TimeDelta::days(14);

    let mut windows = CommitWindows::default();
    for at in authored {
        if at >= week_ago {
            windows.this_week += 1;
        } else if at >= two_weeks_ago {
            windows.last_week += 1;
        }
    }
    windows
}

/// Week-over-week change in percent, 0 when last week had no commits.
///
/// Halves round toward positive infinity, so -12.5 becomes -12.
pub fn percentage_change(this_week: u64, last_week: u64) -> i64 {
    if last_week == 0 {
        return 0;
    }

    let change = (this_week as f64 - last_week as f64) / last_week as f64 * 100.0;
    (change + 0.5).floor() as i64
}
