//! Shared test helpers: visitors collecting traversal output
#![allow(dead_code)]

use ctxlog::{Ctx, Result, Value, Visitor};

/// Builds a JSON object from structured traversal events, or a flat
/// single-level object from key/value traversal events.
#[derive(Default)]
pub struct MapVisitor {
    m: serde_json::Map<String, serde_json::Value>,
    stack: Vec<(String, serde_json::Map<String, serde_json::Value>)>,
}

impl Visitor for MapVisitor {
    fn on_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.m.insert(key.to_string(), value.to_json_value());
        Ok(())
    }

    fn on_obj_start(&mut self, key: &str) -> Result<()> {
        self.stack
            .push((key.to_string(), std::mem::take(&mut self.m)));
        Ok(())
    }

    fn on_obj_end(&mut self) -> Result<()> {
        let (key, parent) = self.stack.pop().expect("unbalanced object events");
        let done = std::mem::replace(&mut self.m, parent);
        self.m.insert(key, serde_json::Value::Object(done));
        Ok(())
    }
}

impl MapVisitor {
    pub fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(self.m)
    }
}

/// Nested object produced by the structured traversal.
pub fn structured(ctx: &Ctx) -> serde_json::Value {
    let mut v = MapVisitor::default();
    ctx.visit_structured(&mut v).expect("traversal failed");
    v.into_json()
}

/// Single-level object keyed by the dotted paths of the flat traversal.
pub fn flat(ctx: &Ctx) -> serde_json::Value {
    let mut v = MapVisitor::default();
    ctx.visit_key_values(&mut v).expect("traversal failed");
    v.into_json()
}

/// Flat traversal as an ordered event list.
pub fn flat_events(ctx: &Ctx) -> Vec<(String, serde_json::Value)> {
    struct Events(Vec<(String, serde_json::Value)>);

    impl Visitor for Events {
        fn on_value(&mut self, key: &str, value: &Value) -> Result<()> {
            self.0.push((key.to_string(), value.to_json_value()));
            Ok(())
        }
    }

    let mut v = Events(Vec::new());
    ctx.visit_key_values(&mut v).expect("traversal failed");
    v.0
}
