//! Message template parser and renderer
//!
//! Templates mix literal text, `\`-escapes, positional `%verb` directives,
//! and `%{[+#@]key[:verb]}` properties. A property both interpolates its
//! argument and reports it to the capture callback, which is how fields
//! named in a template end up in the log call's context.
//!
//! Render buffers are pooled per thread; a drop guard returns the buffer on
//! every exit path, including unwinding out of a visitor callback.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::ops::{Deref, DerefMut};

use super::arg::Arg;
use super::error_ctx::ErrorContext;
use super::value::Value;

/// Capture callback: `(key, positional_index, argument)`. The key is empty
/// for positional `%verb` directives; the argument is `None` when the
/// template names more slots than the call supplied.
pub type CaptureFn<'a> = dyn FnMut(&str, usize, Option<Arg>) + 'a;

/// Render `msg` against `args`.
///
/// Returns the rendered string and the arguments no directive consumed, in
/// their original order. The caller decides what to do with the rest (the
/// logger facade reports errors among them as causes and appends an
/// `{EXTRA_FIELDS: …}` suffix).
pub fn format(cb: &mut CaptureFn<'_>, msg: &str, args: Vec<Arg>) -> (String, Vec<Arg>) {
    let mut printer = Printer {
        buf: PooledBuf::acquire(),
        cb,
        args: args.into_iter().map(Some).collect(),
    };
    printer.printf(msg);

    let rendered = printer.buf.as_str().to_string();
    let rest: Vec<Arg> = printer.args.into_iter().flatten().collect();
    (rendered, rest)
}

thread_local! {
    static BUF_POOL: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

const POOL_KEEP: usize = 8;

struct PooledBuf {
    buf: String,
}

impl PooledBuf {
    fn acquire() -> PooledBuf {
        let buf = BUF_POOL
            .with(|p| p.borrow_mut().pop())
            .unwrap_or_default();
        PooledBuf { buf }
    }
}

impl Drop for PooledBuf {
    fn drop(&mut self) {
        let mut buf = std::mem::take(&mut self.buf);
        buf.clear();
        BUF_POOL.with(|p| {
            let mut pool = p.borrow_mut();
            if pool.len() < POOL_KEEP {
                pool.push(buf);
            }
        });
    }
}

impl Deref for PooledBuf {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuf {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

struct Printer<'a, 'c> {
    buf: PooledBuf,
    cb: &'a mut CaptureFn<'c>,
    args: Vec<Option<Arg>>,
}

enum Renderable<'a> {
    Value(&'a Value),
    Err(&'a (dyn ErrorContext + Send + Sync)),
    Missing,
}

impl Printer<'_, '_> {
    fn printf(&mut self, msg: &str) {
        let bytes = msg.as_bytes();
        let end = bytes.len();
        let mut i = 0;
        let mut arg_idx = 0;

        while i < end {
            match bytes[i] {
                b'\\' => {
                    // escaped character emitted literally; a trailing
                    // backslash is itself literal
                    match msg[i + 1..].chars().next() {
                        Some(ch) => {
                            self.buf.push(ch);
                            i += 1 + ch.len_utf8();
                        }
                        None => {
                            self.buf.push('\\');
                            i += 1;
                        }
                    }
                }
                b'%' => {
                    if i + 1 >= end {
                        self.buf.push('%');
                        break;
                    }
                    match bytes[i + 1] {
                        b'%' => {
                            self.buf.push('%');
                            i += 2;
                        }
                        b'{' => {
                            match bytes[i + 2..].iter().position(|&b| b == b'}') {
                                None => {
                                    // unterminated property: emit the
                                    // remainder literally and stop
                                    self.buf.push_str(&msg[i + 1..]);
                                    return;
                                }
                                Some(p) => {
                                    let inner = &msg[i + 2..i + 2 + p];
                                    self.property(inner, arg_idx);
                                    arg_idx += 1;
                                    i += 2 + p + 1;
                                }
                            }
                        }
                        _ => {
                            // positional verb: the directive run extends to
                            // the next space or the end of the template
                            let run_end = bytes[i + 1..]
                                .iter()
                                .position(|&b| b == b' ')
                                .map(|p| i + 1 + p)
                                .unwrap_or(end);
                            self.verb(&msg[i + 1..run_end], arg_idx);
                            arg_idx += 1;
                            i = run_end;
                        }
                    }
                }
                _ => {
                    let next = bytes[i..]
                        .iter()
                        .position(|&b| b == b'\\' || b == b'%')
                        .map(|p| i + p)
                        .unwrap_or(end);
                    self.buf.push_str(&msg[i..next]);
                    i = next;
                }
            }
        }
    }

    fn verb(&mut self, pattern: &str, arg_idx: usize) {
        let arg = self.take_arg(arg_idx);

        match &arg {
            Some(Arg::Field(f)) => self.render_directive(None, pattern, Renderable::Value(&f.value)),
            Some(Arg::Value(v)) => self.render_directive(None, pattern, Renderable::Value(v)),
            Some(Arg::Err(e)) => self.render_directive(None, pattern, Renderable::Err(e.as_ref())),
            None => self.render_directive(None, pattern, Renderable::Missing),
        }

        // fields and errors consumed by a bare verb are still reported, so
        // field captures reach the context and errors become causes
        match arg {
            Some(Arg::Field(_)) | Some(Arg::Err(_)) => (self.cb)("", arg_idx, arg),
            _ => {}
        }
    }

    fn property(&mut self, inner: &str, arg_idx: usize) {
        let (prefix, key, pattern) = parse_property(inner);
        let arg = self.take_arg(arg_idx);

        match &arg {
            Some(Arg::Field(f)) => {
                self.render_directive(prefix, pattern, Renderable::Value(&f.value))
            }
            Some(Arg::Value(v)) => self.render_directive(prefix, pattern, Renderable::Value(v)),
            Some(Arg::Err(e)) => self.render_directive(prefix, pattern, Renderable::Err(e.as_ref())),
            None => self.render_directive(prefix, pattern, Renderable::Missing),
        }

        (self.cb)(key, arg_idx, arg);
    }

    fn take_arg(&mut self, idx: usize) -> Option<Arg> {
        self.args.get_mut(idx).and_then(Option::take)
    }

    fn render_directive(&mut self, prefix: Option<char>, pattern: &str, what: Renderable<'_>) {
        if prefix == Some('@') {
            let json = match what {
                Renderable::Value(v) => v.to_json_value(),
                Renderable::Err(e) => serde_json::Value::String(e.to_string()),
                Renderable::Missing => serde_json::Value::Null,
            };
            self.buf.push_str(&json.to_string());
            return;
        }

        let mut plus = prefix == Some('+');
        let mut sharp = prefix == Some('#');
        let mut verb = 'v';
        let mut tail = "";
        for (pos, ch) in pattern.char_indices() {
            match ch {
                '+' => plus = true,
                '#' => sharp = true,
                // width, precision, and alignment are accepted and ignored
                '-' | ' ' | '.' => {}
                c if c.is_ascii_digit() => {}
                c if c.is_ascii_alphabetic() => {
                    verb = c;
                    tail = &pattern[pos + 1..];
                    break;
                }
                _ => {
                    tail = &pattern[pos..];
                    break;
                }
            }
        }

        match what {
            Renderable::Missing => self.buf.push_str("<nil>"),
            Renderable::Err(e) => match verb {
                'q' => {
                    let _ = write!(self.buf.deref_mut(), "{:?}", e.to_string());
                }
                _ => self.buf.push_str(&e.to_string()),
            },
            Renderable::Value(v) => self.render_value(v, verb, plus, sharp),
        }
        self.buf.push_str(tail);
    }

    fn render_value(&mut self, v: &Value, verb: char, plus: bool, sharp: bool) {
        let buf: &mut String = self.buf.deref_mut();
        match verb {
            'v' if plus || sharp => match v {
                Value::Str(s) => {
                    let _ = write!(buf, "{:?}", s);
                }
                Value::Time(t) => {
                    let _ = write!(buf, "{:?}", t);
                }
                Value::Duration(d) => {
                    let _ = write!(buf, "{:?}", d);
                }
                Value::Any(j) if sharp => {
                    let _ = write!(buf, "{:#}", j);
                }
                other => {
                    let _ = write!(buf, "{}", other);
                }
            },
            'q' => match v {
                Value::Str(s) => {
                    let _ = write!(buf, "{:?}", s);
                }
                other => {
                    let _ = write!(buf, "\"{}\"", other);
                }
            },
            'x' | 'X' | 'b' | 'o' => match int_payload(v) {
                Some(n) => {
                    let _ = match verb {
                        'x' => write!(buf, "{:x}", n),
                        'X' => write!(buf, "{:X}", n),
                        'b' => write!(buf, "{:b}", n),
                        _ => write!(buf, "{:o}", n),
                    };
                }
                None => {
                    let _ = write!(buf, "{}", v);
                }
            },
            _ => {
                let _ = write!(buf, "{}", v);
            }
        }
    }
}

fn int_payload(v: &Value) -> Option<i128> {
    match v {
        Value::Int(n) => Some(i128::from(*n)),
        Value::Int64(n) => Some(i128::from(*n)),
        Value::Uint(n) => Some(i128::from(*n)),
        Value::Uint64(n) => Some(i128::from(*n)),
        _ => None,
    }
}

fn parse_property(p: &str) -> (Option<char>, &str, &str) {
    let (prefix, rest) = match p.as_bytes().first() {
        Some(b'+') => (Some('+'), &p[1..]),
        Some(b'#') => (Some('#'), &p[1..]),
        Some(b'@') => (Some('@'), &p[1..]),
        _ => (None, p),
    };
    match rest.split_once(':') {
        Some((key, pattern)) if !pattern.is_empty() => (prefix, key, pattern),
        Some((key, _)) => (prefix, key, "v"),
        None => (prefix, rest, "v"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_ctx::BasicError;
    use crate::core::field::Field;

    fn run(msg: &str, args: Vec<Arg>) -> (String, Vec<Arg>, Vec<(String, usize, bool)>) {
        let mut captures = Vec::new();
        let mut cb = |key: &str, idx: usize, arg: Option<Arg>| {
            captures.push((key.to_string(), idx, arg.is_some()));
        };
        let (rendered, rest) = format(&mut cb, msg, args);
        (rendered, rest, captures)
    }

    #[test]
    fn test_plain_literal() {
        let (rendered, rest, captures) = run("hello world", vec![]);
        assert_eq!(rendered, "hello world");
        assert!(rest.is_empty());
        assert!(captures.is_empty());
    }

    #[test]
    fn test_property_renders_and_captures() {
        let (rendered, _, captures) = run(
            "info with %{custom} message and number of %{number}",
            vec![Arg::from("user"), Arg::from(42_i32)],
        );
        assert_eq!(rendered, "info with user message and number of 42");
        assert_eq!(
            captures,
            vec![("custom".to_string(), 0, true), ("number".to_string(), 1, true)]
        );
    }

    #[test]
    fn test_bare_verb_does_not_capture_plain_values() {
        let (rendered, rest, captures) = run("count %v", vec![Arg::from(3_i32)]);
        assert_eq!(rendered, "count 3");
        assert!(rest.is_empty());
        assert!(captures.is_empty());
    }

    #[test]
    fn test_bare_verb_reports_fields() {
        let (rendered, _, captures) = run("count %v", vec![Arg::from(Field::int("n", 3))]);
        assert_eq!(rendered, "count 3");
        assert_eq!(captures, vec![("".to_string(), 0, true)]);
    }

    #[test]
    fn test_bare_verb_reports_errors() {
        let (rendered, _, captures) = run("fail %v", vec![Arg::err(BasicError::new("boom"))]);
        assert_eq!(rendered, "fail boom");
        assert_eq!(captures, vec![("".to_string(), 0, true)]);
    }

    #[test]
    fn test_escapes_emit_literally() {
        let (rendered, _, _) = run(r"100\% done \\ and \{x}", vec![]);
        assert_eq!(rendered, r"100% done \ and {x}");
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        let (rendered, _, _) = run(r"tail\", vec![]);
        assert_eq!(rendered, r"tail\");
    }

    #[test]
    fn test_double_percent() {
        let (rendered, rest, _) = run("50%% off", vec![Arg::from(1_i32)]);
        assert_eq!(rendered, "50% off");
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_unterminated_property_emits_remainder() {
        let (rendered, _, captures) = run("oops %{key and more", vec![Arg::from(1_i32)]);
        assert_eq!(rendered, "oops {key and more");
        assert!(captures.is_empty());
    }

    #[test]
    fn test_missing_argument_renders_nil_and_captures() {
        let (rendered, _, captures) = run("empty %{key}", vec![]);
        assert_eq!(rendered, "empty <nil>");
        assert_eq!(captures, vec![("key".to_string(), 0, false)]);
    }

    #[test]
    fn test_json_prefix() {
        let (rendered, _, _) = run("payload %{@body}", vec![Arg::from("x")]);
        assert_eq!(rendered, "payload \"x\"");
    }

    #[test]
    fn test_custom_verb_with_quoting() {
        let (rendered, _, _) = run("said %{word:q}", vec![Arg::from("hi")]);
        assert_eq!(rendered, "said \"hi\"");
    }

    #[test]
    fn test_hex_verb() {
        let (rendered, _, _) = run("addr %{p:x}", vec![Arg::from(255_i32)]);
        assert_eq!(rendered, "addr ff");
    }

    #[test]
    fn test_directive_tail_is_literal() {
        let (rendered, _, _) = run("n=%d, done", vec![Arg::from(7_i32)]);
        assert_eq!(rendered, "n=7, done");
    }

    #[test]
    fn test_unused_args_are_returned() {
        let (rendered, rest, _) = run("msg %{a}", vec![Arg::from(1_i32), Arg::from(2_i32)]);
        assert_eq!(rendered, "msg 1");
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_property_default_verb_after_colon() {
        let (rendered, _, captures) = run("v=%{key:}", vec![Arg::from(5_i32)]);
        assert_eq!(rendered, "v=5");
        assert_eq!(captures[0].0, "key");
    }
}
