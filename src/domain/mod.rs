//! Domain layer for rask-logger.
//!
//! Contains the canonical types shared across all modules:
//! - `Severity`: ordered event severity (Debug/Info/Warning/Error)
//! - `Payload`: arbitrary log content
//! - `LogServiceError`: top-level error type

pub mod error;
pub mod payload;
pub mod severity;

pub use error::LogServiceError;
pub use payload::{ABSENT_PLACEHOLDER, Payload};
pub use severity::{ParseSeverityError, Severity};
