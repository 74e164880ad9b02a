//! Core types: context tree, values, formatting, logger facade

pub mod arg;
pub mod caller;
pub mod ctx;
pub mod error;
pub mod error_ctx;
pub mod field;
pub mod format;
pub mod level;
pub mod logger;
pub mod sink;
pub mod value;
pub mod visitor;

pub use arg::Arg;
pub use caller::Caller;
pub use ctx::Ctx;
pub use error::{Error, Result};
pub use error_ctx::{BasicError, BoxedError, ErrorContext};
pub use field::Field;
pub use format::format;
pub use level::Level;
pub use logger::Logger;
pub use sink::Sink;
pub use value::{Value, ValueRef};
pub use visitor::Visitor;
