//! Standardized field constructors
//!
//! A small hand-written slice of a standardized field schema. Each
//! constructor returns a field with `standardized = true` under its fully
//! qualified dotted key; sinks surface these at the top level of a record
//! while user fields are nested under a dedicated namespace. The core does
//! not validate keys against any schema, it only honors the flag.

use std::time::Duration;

use crate::core::{Field, Level};

pub fn log_level(lvl: Level) -> Field {
    Field::std("log.level", lvl.as_str())
}

pub fn log_origin_file_path(path: impl Into<String>) -> Field {
    Field::std("log.origin.file.path", path.into())
}

pub fn log_origin_file_name(name: impl Into<String>) -> Field {
    Field::std("log.origin.file.name", name.into())
}

pub fn log_origin_file_line(line: u32) -> Field {
    Field {
        standardized: true,
        ..Field::uint("log.origin.file.line", line)
    }
}

pub fn message(msg: impl Into<String>) -> Field {
    Field::std("message", msg.into())
}

pub fn error_message(msg: impl Into<String>) -> Field {
    Field::std("error.message", msg.into())
}

pub fn host_hostname(name: impl Into<String>) -> Field {
    Field::std("host.hostname", name.into())
}

pub fn service_name(name: impl Into<String>) -> Field {
    Field::std("service.name", name.into())
}

pub fn event_duration(d: Duration) -> Field {
    Field {
        standardized: true,
        ..Field::duration("event.duration", d)
    }
}
