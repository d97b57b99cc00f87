use std::time::Duration;

use chrono::{DateTime, TimeZone};

use super::timestamp::{NaiveTimestampZone, OriginTimestamp};

pub const DEFAULT_STALE_GRACE: Duration = Duration::from_secs(10);

/// Outcome of checking a command's origin time against the agent start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalenessVerdict {
    /// Originated no more than `grace` before start (or after it).
    Fresh { lag: Duration },
    /// Origin time missing, unparseable or unresolvable; accepted.
    UnknownOrigin,
    /// Originated more than `grace` before start.
    Stale { lag: Duration },
}

impl StalenessVerdict {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StalenessFilter {
    grace: Duration,
    naive_zone: NaiveTimestampZone,
}

impl StalenessFilter {
    pub fn new(grace: Duration, naive_zone: NaiveTimestampZone) -> Self {
        Self { grace, naive_zone }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    pub fn evaluate<Tz: TimeZone>(
        &self,
        origin: Option<OriginTimestamp>,
        start_time: &DateTime<Tz>,
    ) -> StalenessVerdict {
        let Some(origin) = origin.and_then(|o| o.resolve(self.naive_zone)) else {
            return StalenessVerdict::UnknownOrigin;
        };

        // Negative lag (origin after start) fails to_std and counts as fresh.
        let lag = (start_time.naive_utc() - origin.naive_utc())
            .to_std()
            .unwrap_or(Duration::ZERO);

        if lag > self.grace {
            StalenessVerdict::Stale { lag }
        } else {
            StalenessVerdict::Fresh { lag }
        }
    }
}

impl Default for StalenessFilter {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_GRACE, NaiveTimestampZone::default())
    }
}
