//! Optional tracing integration.
//!
//! With the `tracing-integration` feature the usual `tracing` macros are
//! re-exported here. Without it the same names resolve to macros that expand
//! to nothing, so call sites never need their own `cfg` attributes.
//!
//! ```ignore
//! use crate::tracing_compat::{debug, warn};
//!
//! debug!(protocol = %id, "comparator registered");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __authctx_tracing_noop {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing-integration"))]
pub use crate::__authctx_tracing_noop as debug;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__authctx_tracing_noop as error;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__authctx_tracing_noop as info;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__authctx_tracing_noop as trace;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__authctx_tracing_noop as warn;

/// Returns `true` when structured logging is compiled in.
#[must_use]
pub const fn is_enabled() -> bool {
    cfg!(feature = "tracing-integration")
}
