//! Fields: named, typed key/value pairs
//!
//! A field key is a dotted path (`a.b.c`); the `.` separator is reserved for
//! structural nesting by the structured traversal. The `standardized` flag
//! partitions fields into the user and standardized classes that filter
//! views separate.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

use super::ctx::Ctx;
use super::value::Value;

#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub value: Value,
    pub standardized: bool,
}

impl Field {
    /// Create a user field from a key and any value-convertible payload.
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Field {
        Field {
            key: key.into(),
            value: value.into(),
            standardized: false,
        }
    }

    /// Create a standardized field. Constructors of a field catalog use this;
    /// the key must be a fully qualified dotted path from the schema.
    pub fn std(key: impl Into<String>, value: impl Into<Value>) -> Field {
        Field {
            key: key.into(),
            value: value.into(),
            standardized: true,
        }
    }

    pub fn str(key: impl Into<String>, value: impl Into<String>) -> Field {
        Field::new(key, Value::Str(value.into()))
    }

    pub fn int(key: impl Into<String>, value: i32) -> Field {
        Field::new(key, Value::Int(value))
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Field {
        Field::new(key, Value::Int64(value))
    }

    pub fn uint(key: impl Into<String>, value: u32) -> Field {
        Field::new(key, Value::Uint(value))
    }

    pub fn uint64(key: impl Into<String>, value: u64) -> Field {
        Field::new(key, Value::Uint64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Field {
        Field::new(key, Value::Float64(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Field {
        Field::new(key, Value::Bool(value))
    }

    pub fn time(key: impl Into<String>, value: DateTime<Utc>) -> Field {
        Field::new(key, Value::Time(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Field {
        Field::new(key, Value::Duration(value))
    }

    pub fn any<T: serde::Serialize + fmt::Debug>(key: impl Into<String>, value: T) -> Field {
        Field::new(key, Value::any(value))
    }

    pub fn ctx(key: impl Into<String>, ctx: Ctx) -> Field {
        Field::new(key, Value::ctx(ctx))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
