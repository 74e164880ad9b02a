//! Logger facade
//!
//! A logger owns a context and a shared sink. `with` derives a child logger
//! whose context snapshots the parent's, so deriving is cheap and children
//! never observe later writes to the parent. Each log call builds a local
//! context on top of the logger's own, feeds it the captures the message
//! template names, and hands the finished record to the sink.

use std::sync::Arc;

use super::arg::Arg;
use super::caller::Caller;
use super::ctx::Ctx;
use super::error_ctx::BoxedError;
use super::field::Field;
use super::format;
use super::level::Level;
use super::sink::Sink;

#[derive(Clone)]
pub struct Logger {
    ctx: Ctx,
    sink: Arc<dyn Sink>,
}

impl Logger {
    pub fn new(sink: impl Sink + 'static) -> Logger {
        Logger {
            ctx: Ctx::new(None, None),
            sink: Arc::new(sink),
        }
    }

    pub fn is_enabled(&self, lvl: Level) -> bool {
        self.sink.is_enabled(lvl)
    }

    /// Derive a logger carrying additional fields, given as alternating
    /// `(key, value)` pairs or pre-built fields (see
    /// [`Ctx::add_all`](super::ctx::Ctx::add_all)).
    pub fn with(&self, args: impl IntoIterator<Item = Arg>) -> Logger {
        let mut ctx = Ctx::new(Some(&self.ctx), None);
        ctx.add_all(args);
        Logger {
            ctx,
            sink: Arc::clone(&self.sink),
        }
    }

    /// Derive a logger carrying additional pre-built fields.
    pub fn with_fields(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut ctx = Ctx::new(Some(&self.ctx), None);
        ctx.add_fields(fields);
        Logger {
            ctx,
            sink: Arc::clone(&self.sink),
        }
    }

    #[track_caller]
    pub fn trace(&self, msg: &str, args: impl IntoIterator<Item = Arg>) {
        self.log(Level::Trace, msg, args);
    }

    #[track_caller]
    pub fn debug(&self, msg: &str, args: impl IntoIterator<Item = Arg>) {
        self.log(Level::Debug, msg, args);
    }

    #[track_caller]
    pub fn info(&self, msg: &str, args: impl IntoIterator<Item = Arg>) {
        self.log(Level::Info, msg, args);
    }

    #[track_caller]
    pub fn error(&self, msg: &str, args: impl IntoIterator<Item = Arg>) {
        self.log(Level::Error, msg, args);
    }

    #[track_caller]
    pub fn log(&self, lvl: Level, msg: &str, args: impl IntoIterator<Item = Arg>) {
        if !self.is_enabled(lvl) {
            return;
        }
        let caller = Caller::here();
        let args: Vec<Arg> = args.into_iter().collect();
        if self.sink.uses_context() {
            self.log_msg_ctx(lvl, caller, msg, args);
        } else {
            self.log_msg(lvl, caller, msg, args);
        }
    }

    fn log_msg_ctx(&self, lvl: Level, caller: Caller, msg: &str, args: Vec<Arg>) {
        let mut ctx = Ctx::new(Some(&self.ctx), None);
        let mut causes: Vec<BoxedError> = Vec::new();

        let (rendered, rest) = {
            let mut cb = |key: &str, idx: usize, arg: Option<Arg>| match arg {
                Some(Arg::Field(f)) => {
                    if key.is_empty() {
                        ctx.add_field(f);
                    } else {
                        // explicit capture key prefixes the field's own key
                        ctx.add(format!("{}.{}", key, f.key), f.value);
                    }
                }
                Some(Arg::Value(v)) => ctx.add(ensure_key(key, idx), v),
                Some(Arg::Err(e)) => {
                    if !key.is_empty() {
                        ctx.add_field(Field::str(key, e.to_string()));
                    }
                    causes.push(e);
                }
                None => {
                    ctx.add_field(Field::any(ensure_key(key, idx), serde_json::Value::Null))
                }
            };
            format::format(&mut cb, msg, args)
        };

        let msg = finish_msg(rendered, &rest);
        collect_causes(rest, &mut causes);

        self.sink.log(lvl, caller, &msg, ctx, causes);
    }

    fn log_msg(&self, lvl: Level, caller: Caller, msg: &str, args: Vec<Arg>) {
        let mut causes: Vec<BoxedError> = Vec::new();

        let (rendered, rest) = {
            let mut cb = |_key: &str, _idx: usize, arg: Option<Arg>| {
                if let Some(Arg::Err(e)) = arg {
                    causes.push(e);
                }
            };
            format::format(&mut cb, msg, args)
        };

        let msg = finish_msg(rendered, &rest);
        collect_causes(rest, &mut causes);

        self.sink.log(lvl, caller, &msg, Ctx::new(None, None), causes);
    }
}

fn ensure_key(key: &str, idx: usize) -> String {
    if key.is_empty() {
        idx.to_string()
    } else {
        key.to_string()
    }
}

fn finish_msg(rendered: String, rest: &[Arg]) -> String {
    if rest.is_empty() {
        return rendered;
    }
    let extras = rest
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!("{} {{EXTRA_FIELDS: [{}]}}", rendered, extras)
}

fn collect_causes(rest: Vec<Arg>, causes: &mut Vec<BoxedError>) {
    for arg in rest {
        if let Arg::Err(e) = arg {
            causes.push(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    #[test]
    fn test_with_derives_isolated_child() {
        let sink = MemorySink::new();
        let root = Logger::new(sink.clone());
        let child = root.with([Arg::from("service"), Arg::from("api")]);

        child.info("ready", []);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "ready");
        assert_eq!(
            records[0].ctx_json(),
            serde_json::json!({"service": "api"})
        );
    }

    #[test]
    fn test_caller_is_call_site() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        logger.info("here", []);

        let records = sink.records();
        assert!(records[0].caller.file().ends_with("logger.rs"));
    }

    #[test]
    fn test_disabled_level_skips_sink() {
        let sink = MemorySink::new().with_min_level(Level::Error);
        let logger = Logger::new(sink.clone());
        logger.debug("nope", []);
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_extra_fields_suffix() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        logger.info("done", [Arg::from(1_i32), Arg::from(2_i32)]);

        let records = sink.records();
        assert_eq!(records[0].message, "done {EXTRA_FIELDS: [1 2]}");
    }
}
