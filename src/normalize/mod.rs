//! Turns loosely shaped quiz service payloads into canonical records.
//!
//! The service has changed field names and shapes over time, so every field
//! is resolved from an ordered list of aliases and every shape mismatch
//! degrades to an empty value instead of an error.

mod fields;
mod history;
mod quiz;
mod timestamp;

pub use history::normalize_history_list;
pub use quiz::{normalize_quiz, normalize_quiz_value};
pub use timestamp::canonicalize_timestamp;
