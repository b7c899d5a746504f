//! Compatibility layers for the wider logging ecosystem.
//!
//! - `tracing_layer`: Forward `tracing` events into a jlo `Logger`

pub mod tracing_layer;

pub use tracing_layer::{JloLayer, init_tracing_bridge};
