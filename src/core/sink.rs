//! Sink trait for log record consumers

use super::caller::Caller;
use super::ctx::Ctx;
use super::error_ctx::BoxedError;
use super::level::Level;

/// Back-end consuming finished log records.
///
/// A sink receives the record parts as the logger assembled them and decides
/// on layout and destination itself, traversing the context through one of
/// the visitor adapters. Sinks are shared between derived loggers, so they
/// take `&self` and manage their own interior mutability.
pub trait Sink: Send + Sync {
    fn is_enabled(&self, lvl: Level) -> bool;

    /// When false the logger skips building a per-call context and the
    /// capture side effects of message formatting.
    fn uses_context(&self) -> bool;

    fn log(&self, lvl: Level, caller: Caller, msg: &str, ctx: Ctx, causes: Vec<BoxedError>);
}
