pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{resolve_paths, CliOverrides, ResolvedPaths};
pub use self::tracing::init_tracing_subscriber;
pub use wiring::{default_client_name, AppContext};
