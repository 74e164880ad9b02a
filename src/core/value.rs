//! Typed field values
//!
//! `Value` is the tagged wrapper every field carries. A value is immutable
//! once constructed; visitors materialize the native payload either by
//! matching on the enum or through [`Value::report`], which hands a borrowed
//! [`ValueRef`] view to a callback.

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::ctx::Ctx;
use super::visitor::ctx_to_json;

/// Value of a structured logging field
#[derive(Debug, Clone)]
pub enum Value {
    Str(String),
    Int(i32),
    Int64(i64),
    Uint(u32),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Time(DateTime<Utc>),
    Duration(Duration),
    /// Opaque payload, already lowered to a JSON document
    Any(serde_json::Value),
    /// Reference to another context, used to nest one tree inside another
    CtxRef(Arc<Ctx>),
}

/// Borrowed view of a [`Value`], handed out by [`Value::report`]
#[derive(Debug, Clone, Copy)]
pub enum ValueRef<'a> {
    Str(&'a str),
    Int(i32),
    Int64(i64),
    Uint(u32),
    Uint64(u64),
    Float64(f64),
    Bool(bool),
    Time(&'a DateTime<Utc>),
    Duration(Duration),
    Any(&'a serde_json::Value),
    CtxRef(&'a Ctx),
}

impl Value {
    /// Wrap an arbitrary serializable payload as an opaque value.
    ///
    /// Payloads that fail to serialize fall back to their `Debug` rendering,
    /// so ingest never fails.
    pub fn any<T: serde::Serialize + fmt::Debug>(v: T) -> Value {
        match serde_json::to_value(&v) {
            Ok(json) => Value::Any(json),
            Err(_) => Value::Any(serde_json::Value::String(format!("{:?}", v))),
        }
    }

    /// Wrap a context as a nested value.
    pub fn ctx(ctx: Ctx) -> Value {
        Value::CtxRef(Arc::new(ctx))
    }

    /// Invoke `f` with the materialized native value.
    pub fn report<R>(&self, f: impl FnOnce(ValueRef<'_>) -> R) -> R {
        f(match self {
            Value::Str(s) => ValueRef::Str(s),
            Value::Int(v) => ValueRef::Int(*v),
            Value::Int64(v) => ValueRef::Int64(*v),
            Value::Uint(v) => ValueRef::Uint(*v),
            Value::Uint64(v) => ValueRef::Uint64(*v),
            Value::Float64(v) => ValueRef::Float64(*v),
            Value::Bool(v) => ValueRef::Bool(*v),
            Value::Time(t) => ValueRef::Time(t),
            Value::Duration(d) => ValueRef::Duration(*d),
            Value::Any(v) => ValueRef::Any(v),
            Value::CtxRef(c) => ValueRef::CtxRef(c),
        })
    }

    /// Convert to `serde_json::Value` for JSON serialization.
    ///
    /// Times render as RFC 3339 strings, durations as nanoseconds, nested
    /// contexts as the object their structured traversal produces.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Int(v) => serde_json::Value::Number((*v).into()),
            Value::Int64(v) => serde_json::Value::Number((*v).into()),
            Value::Uint(v) => serde_json::Value::Number((*v).into()),
            Value::Uint64(v) => serde_json::Value::Number((*v).into()),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Time(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Duration(d) => {
                let nanos = u64::try_from(d.as_nanos()).unwrap_or(u64::MAX);
                serde_json::Value::Number(nanos.into())
            }
            Value::Any(v) => v.clone(),
            Value::CtxRef(c) => ctx_to_json(c),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::Uint(v) => write!(f, "{}", v),
            Value::Uint64(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Time(t) => write!(f, "{}", t.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Any(v) => write!(f, "{}", v),
            Value::CtxRef(c) => write!(f, "{}", ctx_to_json(c)),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Uint(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::Uint64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Ctx> for Value {
    fn from(ctx: Ctx) -> Self {
        Value::ctx(ctx)
    }
}
