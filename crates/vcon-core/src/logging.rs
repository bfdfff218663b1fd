#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the macros below are the real `tracing` macros.
//! Without it every macro expands to nothing, so call sites never need their
//! own `#[cfg]` guards. Always invoke them through the crate root
//! (`vcon_core::debug!(...)`), which resolves in both configurations.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, trace_span, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    /// Discards a debug event.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards an info event.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Discards a trace event.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards a warning event.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Discards an error event.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// Yields an inert span.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::InertSpan
        };
    }

    /// Yields an inert span.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::InertSpan
        };
    }
}

/// Span stand-in used when tracing is compiled out.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct InertSpan;

#[cfg(not(feature = "tracing"))]
impl InertSpan {
    /// Entering an inert span does nothing; the guard exists so call sites
    /// read the same with and without the feature.
    pub fn enter(&self) -> InertGuard {
        InertGuard
    }
}

/// Guard returned by [`InertSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct InertGuard;
