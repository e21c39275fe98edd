//! Logging and observability
//!
//! The anonymizer logs through `tracing`:
//! - batch runs open a span carrying the batch size
//! - rule firings are `trace` events naming the rule and the key, never the value
//! - malformed documents are `debug` events with their index and reason
//!
//! # Example
//!
//! ```no_run
//! use task_anonymizer::logging::{init_logging, LogFormat};
//!
//! init_logging("trace", LogFormat::Pretty).expect("Failed to initialize logging");
//! let output = task_anonymizer::anonymize_batch(&["- password: 'Xk9#vT2q'\n"]);
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LogFormat};
