//! Convenience macros for error handling and propagation

/// Equivalent to `anyhow::bail!` but for `CiteGraphError`
///
/// # Examples
///
/// ```rust
/// use citegraph_common::bail;
/// use citegraph_common::Result;
///
/// fn check_count(count: i64) -> Result<()> {
///     if count < 0 {
///         bail!("Citation count cannot be negative: {}", count);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::CiteGraphError::new($msg))
    };
    ($err:expr $(,)?) => {
        return Err($crate::CiteGraphError::new($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::CiteGraphError::new(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but returns a `CiteGraphError::Validation`
///
/// # Examples
///
/// ```rust
/// use citegraph_common::ensure;
/// use citegraph_common::Result;
///
/// fn validate_samples(samples: usize) -> Result<()> {
///     ensure!(samples >= 2, "Sample count must be at least 2, got: {}", samples);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::CiteGraphError::validation($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::CiteGraphError::validation($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::CiteGraphError::validation(format!($fmt, $($arg)*)));
        }
    };
}

/// Add context to an error while preserving the error chain
///
/// # Examples
///
/// ```rust
/// use citegraph_common::{with_context, Result};
///
/// fn read_log(path: &str) -> Result<String> {
///     std::fs::read_to_string(path)
///         .map_err(|e| with_context!(e, "Failed to read observation log {}", path))
/// }
/// ```
#[macro_export]
macro_rules! with_context {
    ($err:expr, $msg:literal $(,)?) => {
        $crate::CiteGraphError::with_source($msg, $err)
    };
    ($err:expr, $fmt:expr, $($arg:tt)*) => {
        $crate::CiteGraphError::with_source(format!($fmt, $($arg)*), $err)
    };
}
