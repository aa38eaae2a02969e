//! FILENAME: core/fast-export/src/logging.rs
// PURPOSE: Category-tagged logging macros over the `log` facade.
// CONTEXT: The category becomes the log target, so hosts can filter the
// pipeline's output (e.g. `FAST_EXPORT`) independently of other crates.

#[doc(hidden)]
pub use log;

/// Category used by the export pipeline itself.
pub const CATEGORY: &str = "FAST_EXPORT";

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_trace {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::log::trace!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::log::debug!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::log::info!(target: $cat, $($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::log::warn!(target: $cat, $($arg)*)
    };
}
