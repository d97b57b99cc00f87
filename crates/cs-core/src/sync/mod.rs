//! Sync rules: timestamp normalization, command admission and connection health.

pub mod admission;
pub mod dedup;
pub mod health;
pub mod session;
pub mod staleness;
pub mod timestamp;

pub use admission::{admit_command, CommandDecision};
pub use dedup::{CommandDeduplicator, DEFAULT_DEDUP_CAPACITY};
pub use health::{ConnectionHealth, HealthTracker, HealthTransition, DEFAULT_FAILURE_THRESHOLD};
pub use session::AgentSession;
pub use staleness::{StalenessFilter, StalenessVerdict, DEFAULT_STALE_GRACE};
pub use timestamp::{normalize, NaiveTimestampZone, OriginTimestamp, UnparseableTimestamp};
