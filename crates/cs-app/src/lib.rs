//! clipsync application layer
//!
//! Use cases and the background sync worker. Everything here talks to the
//! outside world through the ports defined in `cs-core`.

pub mod usecases;

pub use usecases::*;
