#![forbid(unsafe_code)]

//! Core: pixel geometry, colours, settings, display configuration, and logging.

pub mod color;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod settings;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, trace, trace_span, warn};
