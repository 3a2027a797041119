//! Common types, errors and utilities shared across the citegraph workspace

pub mod error;
pub mod logging;
pub mod macros;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

// Re-export commonly used types
pub use error::{CiteGraphError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
