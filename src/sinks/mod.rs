//! Output back-ends consuming finished log records

pub mod json;
pub mod memory;
pub mod text;

pub use json::JsonSink;
pub use memory::{MemorySink, Record};
pub use text::TextSink;
