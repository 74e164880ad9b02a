//! # ctxlog
//!
//! A structured logging core built around an immutable, shareable context
//! tree.
//!
//! ## Features
//!
//! - **Context tree**: deriving a logger with [`Logger::with`] snapshots the
//!   parent context; any number of derived loggers share frozen ancestors
//!   without copying or locking
//! - **Deterministic output**: fields stream in depth-first insertion order,
//!   with duplicate keys collapsed to the last write
//! - **Message captures**: `%{name}` in a template both interpolates the
//!   argument and adds it to the log call's context
//! - **Two traversals**: flat key/value and nested-object views over the
//!   same field stream, consumed by pluggable sinks
//!
//! ## Example
//!
//! ```
//! use ctxlog::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::new(sink.clone()).with([
//!     Arg::from("service"),
//!     Arg::from("api-gateway"),
//! ]);
//!
//! logger.info("user %{name} logged in", [Arg::from("alice")]);
//!
//! let record = &sink.records()[0];
//! assert_eq!(record.message, "user alice logged in");
//! assert_eq!(
//!     record.ctx_json(),
//!     serde_json::json!({"service": "api-gateway", "name": "alice"})
//! );
//! ```

pub mod core;
pub mod macros;
pub mod schema;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Arg, BasicError, Caller, Ctx, Error, ErrorContext, Field, Level, Logger, Result, Sink,
        Value, ValueRef, Visitor,
    };
    pub use crate::sinks::{JsonSink, MemorySink, TextSink};
}

pub use crate::core::{
    format, Arg, BasicError, BoxedError, Caller, Ctx, Error, ErrorContext, Field, Level, Logger,
    Result, Sink, Value, ValueRef, Visitor,
};
pub use crate::sinks::{JsonSink, MemorySink, TextSink};
