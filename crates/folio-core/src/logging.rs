#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the usual `tracing` macros are re-exported at
//! the crate root. Without it, same-named no-op macros keep call sites
//! compiling at zero cost, which matters for wasm builds that ship without a
//! subscriber.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Span stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span (does nothing).
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Falls back to `info` when `RUST_LOG` is unset or unparsable. Returns
/// `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
