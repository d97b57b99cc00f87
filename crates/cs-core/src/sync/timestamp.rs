//! Normalization of the timestamp encodings the remote store emits.
//!
//! Known formats are tried in a fixed priority order. Formats ending in `Z`
//! are read as UTC and converted to the observer's zone; formats without a
//! zone marker are kept as naive wall-clock values and resolved later by the
//! caller (see [`NaiveTimestampZone`]). When every fixed format fails a
//! flexible ISO-8601 parse is attempted. Failure is a value, never a panic.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Utc,
    Unmarked,
}

const KNOWN_FORMATS: [(&str, Marker); 6] = [
    ("%Y-%m-%dT%H:%M:%S%.fZ", Marker::Utc),
    ("%Y-%m-%dT%H:%M:%SZ", Marker::Utc),
    ("%Y-%m-%dT%H:%M:%S%.f", Marker::Unmarked),
    ("%Y-%m-%dT%H:%M:%S", Marker::Unmarked),
    ("%Y-%m-%d %H:%M:%S%.f", Marker::Unmarked),
    ("%Y-%m-%d %H:%M:%S", Marker::Unmarked),
];

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// A parsed origin time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginTimestamp {
    /// Carried an explicit zone; expressed in the observer's zone.
    Zoned(DateTime<FixedOffset>),
    /// No zone information; the raw wall-clock reading.
    Naive(NaiveDateTime),
}

/// How to place a naive timestamp on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NaiveTimestampZone {
    #[default]
    Utc,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable timestamp: {raw:?}")]
pub struct UnparseableTimestamp {
    pub raw: String,
}

impl OriginTimestamp {
    /// Resolve to an instant, reading naive values in `naive_zone`.
    ///
    /// Returns `None` for local wall-clock readings that do not exist (DST gaps).
    pub fn resolve(self, naive_zone: NaiveTimestampZone) -> Option<DateTime<FixedOffset>> {
        self.resolve_in(naive_zone, &Local)
    }

    pub fn resolve_in<Tz: TimeZone>(
        self,
        naive_zone: NaiveTimestampZone,
        local: &Tz,
    ) -> Option<DateTime<FixedOffset>> {
        match self {
            Self::Zoned(dt) => Some(dt),
            Self::Naive(naive) => match naive_zone {
                NaiveTimestampZone::Utc => Some(to_fixed(Utc.from_utc_datetime(&naive))),
                NaiveTimestampZone::Local => {
                    local.from_local_datetime(&naive).earliest().map(to_fixed)
                }
            },
        }
    }
}

/// Normalize `raw` into the local observer's zone.
pub fn normalize(raw: &str) -> Result<OriginTimestamp, UnparseableTimestamp> {
    normalize_in(raw, &Local)
}

/// Normalize `raw`, expressing zoned results in `observer`.
pub fn normalize_in<Tz: TimeZone>(
    raw: &str,
    observer: &Tz,
) -> Result<OriginTimestamp, UnparseableTimestamp> {
    let trimmed = raw.trim();

    for (format, marker) in KNOWN_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(match marker {
                Marker::Utc => OriginTimestamp::Zoned(to_fixed(
                    Utc.from_utc_datetime(&naive).with_timezone(observer),
                )),
                Marker::Unmarked => OriginTimestamp::Naive(naive),
            });
        }
    }

    flexible_parse(trimmed, observer).ok_or_else(|| UnparseableTimestamp {
        raw: raw.to_string(),
    })
}

fn flexible_parse<Tz: TimeZone>(raw: &str, observer: &Tz) -> Option<OriginTimestamp> {
    let zoned = DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|format| DateTime::parse_from_str(raw, format).ok())
    });
    if let Some(dt) = zoned {
        return Some(OriginTimestamp::Zoned(to_fixed(dt.with_timezone(observer))));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(OriginTimestamp::Naive(naive));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(OriginTimestamp::Naive)
}

fn to_fixed<Tz: TimeZone>(dt: DateTime<Tz>) -> DateTime<FixedOffset> {
    let offset = dt.offset().fix();
    dt.with_timezone(&offset)
}
