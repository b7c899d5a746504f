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
    clippy::cast_possible_truncation, // Formatter widths are small
    clippy::cast_possible_wrap,       // Safe in non-negative contexts
    clippy::cast_precision_loss,      // Acceptable for %e/%g rendering
    clippy::cast_sign_loss,           // Safe where values are known non-negative
    clippy::missing_errors_doc,       // Internal API
    clippy::module_name_repetitions,  // e.g. LoggerConfig in config module
    clippy::must_use_candidate,       // Annotated selectively on critical APIs
    clippy::doc_markdown
)]

//! Light-weight JSON logging.
//!
//! Every accepted log call appends exactly one JSON object followed by `\n`
//! to the logger's sink:
//!
//! ```
//! use jlo::{Logger, clock, test_support::SharedBuffer};
//!
//! let buf = SharedBuffer::new();
//! let mut logger = Logger::new(buf.clone()).with_clock(clock::fixed_clock(clock::zero_instant()));
//! logger.keys = jlo::FieldKeys::short();
//!
//! logger.infof("I'm real", &[]);
//! assert_eq!(
//!     buf.contents(),
//!     "{\"lvl\":\"info\",\"msg\":\"I'm real\",\"time\":\"0001-01-01T00:00:00Z\"}\n"
//! );
//! ```

pub mod config;
pub mod domain;
pub mod global;
pub mod logger;
pub mod test_support;

#[cfg(feature = "tracing-bridge")]
pub mod compat;

mod macros;

// Re-export main types for easy access
pub use config::LoggerConfig;
pub use domain::{FieldKeys, Fields, JloError, LogLevel, parse_level};
pub use global::{default_log_level, default_logger, set_default_log_level};
pub use logger::{Arg, Logger, Sink, clock, sprintf};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
