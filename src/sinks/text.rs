//! Human-readable text sink
//!
//! One line per record: timestamp, level, call site, message, then the
//! context as `| k=v …` via the flat traversal. Error causes follow on
//! their own indented lines with `caused by:` chains.

use chrono::{SecondsFormat, Utc};
use colored::Colorize;
use parking_lot::Mutex;
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::core::{BoxedError, Caller, Ctx, ErrorContext, Level, Result, Sink, Value, Visitor};

pub struct TextSink {
    min_level: Level,
    with_context: bool,
    colors: bool,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TextSink {
    pub fn new(out: impl Write + Send + 'static, min_level: Level, with_context: bool) -> TextSink {
        TextSink {
            min_level,
            with_context,
            colors: false,
            out: Mutex::new(Box::new(out)),
        }
    }

    /// Text sink writing colored lines to standard error.
    pub fn stderr(min_level: Level) -> TextSink {
        let mut sink = TextSink::new(io::stderr(), min_level, true);
        sink.colors = true;
        sink
    }

    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> TextSink {
        self.colors = colors;
        self
    }

    fn write_error(&self, buf: &mut String, err: &(dyn ErrorContext + Send + Sync), indent: &str) {
        buf.push_str(indent);
        if let Some(at) = err.at() {
            let _ = write!(buf, "{}:{}\t", at.basename(), at.line());
        }
        let _ = write!(buf, "{}", err);

        if self.with_context {
            if let Some(ctx) = err.err_context() {
                if !ctx.is_empty() {
                    let mut printer = KvPrinter { buf, n: 0 };
                    let _ = ctx.visit_key_values(&mut printer);
                }
            }
        }
        buf.push('\n');

        match err.num_causes() {
            0 => {}
            1 => {
                if let Some(cause) = ErrorContext::cause(err, 0) {
                    self.write_error(buf, cause, indent);
                }
            }
            n => {
                let cause_indent = format!("{}    ", indent);
                let _ = writeln!(buf, "{}multi-error caused by:", indent);
                let mut written = 0;
                for i in 0..n {
                    if let Some(cause) = ErrorContext::cause(err, i) {
                        if written != 0 {
                            let _ = writeln!(buf, "{}and", indent);
                        }
                        written += 1;
                        self.write_error(buf, cause, &cause_indent);
                    }
                }
            }
        }
    }
}

impl Sink for TextSink {
    fn is_enabled(&self, lvl: Level) -> bool {
        lvl >= self.min_level
    }

    fn uses_context(&self) -> bool {
        self.with_context
    }

    fn log(&self, lvl: Level, caller: Caller, msg: &str, ctx: Ctx, causes: Vec<BoxedError>) {
        let mut buf = String::new();

        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let level_str = format!("{:<5}", lvl.as_str().to_uppercase());
        let level_str = if self.colors {
            level_str.color(lvl.color_code()).to_string()
        } else {
            level_str
        };
        let _ = write!(
            buf,
            "{} {}\t{}:{}\t{}",
            ts,
            level_str,
            caller.basename(),
            caller.line(),
            msg
        );

        if !ctx.is_empty() {
            let mut printer = KvPrinter { buf: &mut buf, n: 0 };
            let _ = ctx.visit_key_values(&mut printer);
        }
        buf.push('\n');

        match causes.len() {
            0 => {}
            1 => self.write_error(&mut buf, causes[0].as_ref(), "\t"),
            _ => {
                buf.push_str("\tcaused by:\n");
                for (i, err) in causes.iter().enumerate() {
                    if i != 0 {
                        buf.push_str("\tand\n");
                    }
                    self.write_error(&mut buf, err.as_ref(), "\t    ");
                }
            }
        }

        let mut out = self.out.lock();
        // sink I/O failures are not the logger's concern
        let _ = out.write_all(buf.as_bytes());
        let _ = out.flush();
    }
}

/// Flat visitor rendering `| k=v k=v …` context tails.
struct KvPrinter<'a> {
    buf: &'a mut String,
    n: usize,
}

impl KvPrinter<'_> {
    fn on_key(&mut self, key: &str) {
        if self.n > 0 {
            self.buf.push(' ');
        } else {
            self.buf.push_str("\t| ");
        }
        self.buf.push_str(key);
        self.buf.push('=');
        self.n += 1;
    }
}

impl Visitor for KvPrinter<'_> {
    fn on_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.on_key(key);
        match value {
            Value::CtxRef(ctx) => {
                self.buf.push('{');
                ctx.visit_key_values(self)?;
                self.buf.push('}');
            }
            Value::Str(s) => {
                let _ = write!(self.buf, "{:?}", s);
            }
            other => {
                let _ = write!(self.buf, "{}", other);
            }
        }
        Ok(())
    }
}
