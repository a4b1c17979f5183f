//! Observability.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host application, which may use [`init_logging`] for a ready-made one.

mod logging;

pub use logging::{LogFormat, LoggingConfig, init_logging};
