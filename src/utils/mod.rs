pub mod time_utils;

// Re-export commonly used functions
pub use time_utils::{format_duration, parse_duration};
