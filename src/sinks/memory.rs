//! In-memory sink capturing finished records
//!
//! Useful for tests and for programs that want to inspect recent log
//! records programmatically. Clones share the same record store.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::core::visitor::ctx_to_json;
use crate::core::{BoxedError, Caller, Ctx, Level, Sink};

/// One captured log record.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub caller: Caller,
    pub message: String,
    pub ctx: Ctx,
    /// String forms of the causes handed to the sink
    pub causes: Vec<String>,
}

impl Record {
    /// The record's context as the JSON object its structured traversal
    /// produces.
    pub fn ctx_json(&self) -> serde_json::Value {
        ctx_to_json(&self.ctx)
    }
}

#[derive(Clone)]
pub struct MemorySink {
    min_level: Level,
    use_context: bool,
    records: Arc<Mutex<Vec<Record>>>,
}

impl MemorySink {
    pub fn new() -> MemorySink {
        MemorySink {
            min_level: Level::Trace,
            use_context: true,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Capture records but report `uses_context() == false`, so the logger
    /// skips context building and capture side effects.
    pub fn without_context() -> MemorySink {
        MemorySink {
            use_context: false,
            ..MemorySink::new()
        }
    }

    #[must_use]
    pub fn with_min_level(mut self, lvl: Level) -> MemorySink {
        self.min_level = lvl;
        self
    }

    /// Snapshot of the captured records.
    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for MemorySink {
    fn is_enabled(&self, lvl: Level) -> bool {
        lvl >= self.min_level
    }

    fn uses_context(&self) -> bool {
        self.use_context
    }

    fn log(&self, lvl: Level, caller: Caller, msg: &str, ctx: Ctx, causes: Vec<BoxedError>) {
        let record = Record {
            level: lvl,
            caller,
            message: msg.to_string(),
            ctx,
            causes: causes.iter().map(|e| e.to_string()).collect(),
        };
        self.records.lock().push(record);
    }
}
