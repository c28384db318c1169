#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_lossless,            // Severity discriminants and line lengths widen losslessly
    clippy::cast_possible_truncation, // Millisecond durations fit in u64
    clippy::missing_errors_doc,       // Errors are the module's thiserror enum
    clippy::missing_panics_doc,       // Non-test code does not panic
    clippy::module_name_repetitions,  // e.g. SinkError in sink module
    clippy::must_use_candidate,       // Annotated selectively
    clippy::doc_markdown
)]

pub mod app;
pub mod config;
pub mod domain;
pub mod forwarding;
pub mod redaction;
pub mod service;
pub mod sink;

pub use config::LogConfig;
pub use domain::{LogServiceError, Payload, Severity};
pub use redaction::{DEFAULT_MASK, sanitize};
pub use service::{LogHandle, LogService};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
