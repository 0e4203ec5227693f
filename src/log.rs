//! Diagnostic logging.
//!
//! With the `tracing` feature the `debug!`/`warn!` macros used across the
//! crate are `tracing`'s own; without it they compile away entirely, so the
//! evaluator and renderer stay free of logging cost by default.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
