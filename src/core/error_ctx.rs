//! Read-only accessors for errors that carry context
//!
//! Errors flowing through the logger may expose an origin location, a cause
//! chain, and their own context tree. The core only reads these; building
//! annotated errors is the job of an external errors package. [`BasicError`]
//! is a minimal concrete carrier for tests and small programs.

use std::error;
use std::fmt;

use super::caller::Caller;
use super::ctx::Ctx;

/// Boxed error as it travels from log arguments to the sink's cause list.
pub type BoxedError = Box<dyn ErrorContext + Send + Sync>;

/// Accessors the core and the sinks use to inspect an error.
///
/// Every method has a trivial default, so adapting a plain error type is a
/// one-line `impl ErrorContext for MyError {}`. Errors are only accessed
/// from the logging thread.
pub trait ErrorContext: error::Error {
    /// Location the error was raised at, if recorded.
    fn at(&self) -> Option<Caller> {
        None
    }

    /// Number of direct causes.
    fn num_causes(&self) -> usize {
        0
    }

    /// The `index`-th direct cause.
    fn cause(&self, index: usize) -> Option<&(dyn ErrorContext + Send + Sync)> {
        let _ = index;
        None
    }

    /// Context captured when the error was created or wrapped.
    fn err_context(&self) -> Option<&Ctx> {
        None
    }
}

/// Plain error with optional origin, context, and causes.
#[derive(Debug, Default)]
pub struct BasicError {
    message: String,
    at: Option<Caller>,
    ctx: Option<Ctx>,
    causes: Vec<BoxedError>,
}

impl BasicError {
    #[track_caller]
    pub fn new(message: impl Into<String>) -> BasicError {
        BasicError {
            message: message.into(),
            at: Some(Caller::here()),
            ctx: None,
            causes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_ctx(mut self, ctx: Ctx) -> BasicError {
        self.ctx = Some(ctx);
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl ErrorContext + Send + Sync + 'static) -> BasicError {
        self.causes.push(Box::new(cause));
        self
    }
}

impl fmt::Display for BasicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl error::Error for BasicError {}

impl ErrorContext for BasicError {
    fn at(&self) -> Option<Caller> {
        self.at
    }

    fn num_causes(&self) -> usize {
        self.causes.len()
    }

    fn cause(&self, index: usize) -> Option<&(dyn ErrorContext + Send + Sync)> {
        self.causes.get(index).map(|c| c.as_ref())
    }

    fn err_context(&self) -> Option<&Ctx> {
        self.ctx.as_ref()
    }
}
