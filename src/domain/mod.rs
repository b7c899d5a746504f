//! Domain layer for jlo.
//!
//! Contains the canonical types shared across all modules:
//! - `LogLevel`: Ordered severity used as the emit threshold
//! - `FieldKeys` / `Fields`: Reserved key names and contextual fields
//! - `JloError`: Top-level error type

pub mod error;
pub mod field;
pub mod log_level;

pub use error::JloError;
pub use field::{FieldKeys, Fields};
pub use log_level::{LogLevel, parse_level};
