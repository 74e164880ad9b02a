//! Heterogeneous log arguments
//!
//! `Arg` is the item type of `add_all` and of the log macros: a positional
//! slot holds either a pre-built field, a bare value, or an error. Scanning
//! rules live in [`Ctx::add_all`](super::ctx::Ctx::add_all): a field consumes
//! one slot, a string value is a key and consumes the following slot as its
//! value.

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

use super::error_ctx::{BoxedError, ErrorContext};
use super::field::Field;
use super::value::Value;

pub enum Arg {
    Field(Field),
    Value(Value),
    Err(BoxedError),
}

impl Arg {
    /// Wrap an error argument. Errors named by a `%{key}` capture are added
    /// to the context as their string form and always end up in the cause
    /// list handed to the sink.
    pub fn err(e: impl ErrorContext + Send + Sync + 'static) -> Arg {
        Arg::Err(Box::new(e))
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Field(field) => f.debug_tuple("Field").field(field).finish(),
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Err(e) => f.debug_tuple("Err").field(&e.to_string()).finish(),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Field(field) => write!(f, "{}", field),
            Arg::Value(value) => write!(f, "{}", value),
            Arg::Err(e) => write!(f, "{}", e),
        }
    }
}

impl From<Field> for Arg {
    fn from(f: Field) -> Self {
        Arg::Field(f)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

macro_rules! arg_from_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Arg {
                fn from(v: $t) -> Self {
                    Arg::Value(Value::from(v))
                }
            }
        )*
    };
}

arg_from_value!(
    String,
    &str,
    i32,
    i64,
    u32,
    u64,
    f64,
    bool,
    DateTime<Utc>,
    Duration,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_ctx::BasicError;

    #[test]
    fn test_scalar_conversions() {
        assert!(matches!(Arg::from("key"), Arg::Value(Value::Str(_))));
        assert!(matches!(Arg::from(1_i32), Arg::Value(Value::Int(1))));
        assert!(matches!(Arg::from(Field::int("n", 1)), Arg::Field(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Arg::from(Field::str("a", "b")).to_string(), "a=b");
        assert_eq!(Arg::err(BasicError::new("boom")).to_string(), "boom");
    }
}
