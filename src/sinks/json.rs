//! JSON sink for structured logging
//!
//! Writes each record as a single-line JSON object (JSONL), compatible with
//! log aggregation tools. The record is composed as a context tree first:
//! standardized fields of the log call at the top level next to the
//! `log.*` / `message` catalog fields, user fields nested under `"fields"`,
//! error causes under `error.*`. The structured visitor then renders the
//! tree into the output object.

use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::visitor::ctx_to_json;
use crate::core::{BoxedError, Caller, Ctx, ErrorContext, Field, Level, Result, Sink};
use crate::schema;

pub struct JsonSink {
    min_level: Level,
    pretty: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonSink {
    /// Create a JSON sink appending to the file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<JsonSink> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(JsonSink::from_writer(BufWriter::new(file)))
    }

    /// Create a JSON sink writing to an arbitrary target.
    pub fn from_writer(out: impl Write + Send + 'static) -> JsonSink {
        JsonSink {
            min_level: Level::Trace,
            pretty: false,
            out: Mutex::new(Box::new(out)),
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, lvl: Level) -> JsonSink {
        self.min_level = lvl;
        self
    }

    /// Emit multi-line indented objects instead of JSONL.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> JsonSink {
        self.pretty = pretty;
        self
    }
}

impl Sink for JsonSink {
    fn is_enabled(&self, lvl: Level) -> bool {
        lvl >= self.min_level
    }

    fn uses_context(&self) -> bool {
        true
    }

    fn log(&self, lvl: Level, caller: Caller, msg: &str, ctx: Ctx, causes: Vec<BoxedError>) {
        let record = build_record(lvl, caller, msg, &ctx, &causes);
        let json = ctx_to_json(&record);

        let mut out = self.out.lock();
        let _ = if self.pretty {
            writeln!(out, "{:#}", json)
        } else {
            writeln!(out, "{}", json)
        };
        let _ = out.flush();
    }
}

fn build_record(lvl: Level, caller: Caller, msg: &str, ctx: &Ctx, causes: &[BoxedError]) -> Ctx {
    let (std_ctx, user_ctx) = if ctx.is_empty() {
        (Ctx::new(None, None), Ctx::new(None, None))
    } else {
        (ctx.standardized(), ctx.user())
    };

    let mut rec = Ctx::new(Some(&std_ctx), None);
    rec.add_fields([
        schema::log_level(lvl),
        schema::log_origin_file_path(caller.file()),
        schema::log_origin_file_name(caller.basename()),
        schema::log_origin_file_line(caller.line()),
        schema::message(msg),
    ]);

    if !user_ctx.is_empty() {
        rec.add_field(Field::ctx("fields", user_ctx));
    }

    // fully qualified keys here, so no error value can get lost in a
    // shadowing merge
    match causes {
        [] => {}
        [cause] => {
            let err_ctx = build_err_ctx(cause.as_ref());
            if !err_ctx.is_empty() {
                rec.add_field(Field::ctx("error.ctx", err_ctx));
            }
            rec.add_field(schema::error_message(cause.to_string()));

            if let Some(at) = cause.at() {
                rec.add_field(Field::str("error.at.file", at.file()));
                rec.add_field(Field::uint("error.at.line", at.line()));
            }

            match cause.num_causes() {
                0 => {}
                1 => {
                    if let Some(c) = ErrorContext::cause(cause.as_ref(), 0) {
                        rec.add_field(Field::any("error.cause", cause_json(c, false)));
                    }
                }
                n => {
                    let arr: Vec<serde_json::Value> = (0..n)
                        .filter_map(|i| ErrorContext::cause(cause.as_ref(), i))
                        .map(|c| cause_json(c, true))
                        .collect();
                    rec.add_field(Field::any("error.causes", serde_json::Value::Array(arr)));
                }
            }
        }
        many => {
            let arr: Vec<serde_json::Value> = many
                .iter()
                .map(|e| cause_json(e.as_ref(), true))
                .collect();
            rec.add_field(Field::any("error.causes", serde_json::Value::Array(arr)));
        }
    }

    rec
}

/// Link the error's own context with the contexts of its linear cause
/// chain, then split into standardized top-level fields and nested user
/// fields. Stops linking when a multi-cause error is discovered.
fn build_err_ctx(err: &(dyn ErrorContext + Send + Sync)) -> Ctx {
    let mut linked = match err.err_context() {
        Some(c) if !c.is_empty() => c.clone(),
        _ => Ctx::new(None, None),
    };
    linked = link_linear_err_ctx(linked, err);

    let std_ctx = linked.standardized();
    let mut err_ctx = Ctx::new(Some(&std_ctx), None);

    let user_ctx = linked.user();
    if !user_ctx.is_empty() {
        err_ctx.add_field(Field::ctx("fields", user_ctx));
    }
    err_ctx
}

fn link_linear_err_ctx(mut ctx: Ctx, mut err: &(dyn ErrorContext + Send + Sync)) -> Ctx {
    loop {
        if err.num_causes() != 1 {
            return ctx;
        }
        let cause = match ErrorContext::cause(err, 0) {
            Some(c) => c,
            None => return ctx,
        };
        if let Some(cause_ctx) = cause.err_context() {
            if !cause_ctx.is_empty() {
                ctx = Ctx::new(Some(&ctx), Some(cause_ctx));
            }
        }
        err = cause;
    }
}

fn cause_json(err: &(dyn ErrorContext + Send + Sync), with_ctx: bool) -> serde_json::Value {
    let mut obj = serde_json::Map::new();

    if let Some(at) = err.at() {
        obj.insert(
            "at".to_string(),
            serde_json::json!({"file": at.file(), "line": at.line()}),
        );
    }

    if with_ctx {
        let ctx = build_err_ctx(err);
        if !ctx.is_empty() {
            obj.insert("ctx".to_string(), ctx_to_json(&ctx));
        }
    }

    match err.num_causes() {
        0 => {}
        1 => {
            if let Some(c) = ErrorContext::cause(err, 0) {
                obj.insert("cause".to_string(), cause_json(c, false));
            }
        }
        n => {
            let arr: Vec<serde_json::Value> = (0..n)
                .filter_map(|i| ErrorContext::cause(err, i))
                .map(|c| cause_json(c, true))
                .collect();
            obj.insert("causes".to_string(), serde_json::Value::Array(arr));
        }
    }

    obj.insert(
        "message".to_string(),
        serde_json::Value::String(err.to_string()),
    );
    serde_json::Value::Object(obj)
}
