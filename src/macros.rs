//! Logging macros for ergonomic message formatting.
//!
//! These macros forward a template and a heterogeneous argument list to a
//! logger. Arguments may be scalars, pre-built fields, or `Arg` values;
//! `%{name}` captures in the template both interpolate an argument and add
//! it to the log call's context.
//!
//! # Examples
//!
//! ```
//! use ctxlog::prelude::*;
//! use ctxlog::info;
//!
//! let logger = Logger::new(MemorySink::new());
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // Captured fields are printed and added to the context
//! info!(logger, "Server listening on port %{port}", 8080);
//!
//! // Pre-built fields work too
//! info!(logger, "request done %v", Field::int("status", 200));
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::new(MemorySink::new());
/// use ctxlog::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: %{code}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $logger.log($level, $msg, [$($crate::Arg::from($arg)),*])
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::new(MemorySink::new());
/// use ctxlog::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: %{value}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Trace, $msg $(, $arg)*)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::new(MemorySink::new());
/// use ctxlog::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: %{count}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Debug, $msg $(, $arg)*)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::new(MemorySink::new());
/// use ctxlog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing %{count} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Info, $msg $(, $arg)*)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use ctxlog::prelude::*;
/// # let logger = Logger::new(MemorySink::new());
/// use ctxlog::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error %{code}: %{reason}", 500, "internal");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $msg:expr $(, $arg:expr)* $(,)?) => {
        $crate::log!($logger, $crate::Level::Error, $msg $(, $arg)*)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Level, Logger};
    use crate::sinks::MemorySink;

    #[test]
    fn test_log_macro() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        log!(logger, Level::Info, "Test message");
        log!(logger, Level::Info, "Formatted: %{n}", 42);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].message, "Formatted: 42");
        assert_eq!(records[1].ctx_json(), serde_json::json!({"n": 42}));
    }

    #[test]
    fn test_trace_macro() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        trace!(logger, "Trace message");
        trace!(logger, "Value: %{v}", 10);
        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn test_debug_macro() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        debug!(logger, "Debug message");
        debug!(logger, "Count: %{count}", 5);
        assert_eq!(sink.records()[1].ctx_json(), serde_json::json!({"count": 5}));
    }

    #[test]
    fn test_info_macro() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        info!(logger, "Info message");
        info!(logger, "Items: %{items}", 100);
        assert_eq!(sink.records()[1].message, "Items: 100");
    }

    #[test]
    fn test_error_macro() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        error!(logger, "Error message");
        error!(logger, "Code: %{code}", 500);
        assert_eq!(sink.records()[1].level, Level::Error);
    }

    #[test]
    fn test_trailing_comma() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        info!(logger, "pair %{a} %{b}", 1, 2,);
        assert_eq!(
            sink.records()[0].ctx_json(),
            serde_json::json!({"a": 1, "b": 2})
        );
    }
}
