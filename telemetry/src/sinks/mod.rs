//! Local sinks.
//!
//! The event collector sink lives in [`crate::hec`].

mod console;
mod json_lines;

pub use console::ConsoleSink;
pub use json_lines::JsonLinesSink;
