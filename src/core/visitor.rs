//! Traversal adapters turning a context tree into callback streams
//!
//! Two complementary views are derived from the same merged field stream:
//! a flat `(dotted_key, value)` sequence and a structured event stream that
//! interprets dotted keys as paths into nested objects. Both collapse
//! duplicate keys to the last write in depth-first `before, local, after`
//! order; the structured view is computed from the collapsed flat stream,
//! so the two can never disagree.

use std::collections::HashMap;

use super::ctx::Ctx;
use super::error::Result;
use super::field::Field;
use super::value::Value;

/// Consumer of a context traversal.
///
/// `on_obj_start` / `on_obj_end` fire for the structured traversal only.
/// Returning an error aborts the traversal; the error surfaces verbatim to
/// whoever initiated it.
pub trait Visitor {
    fn on_value(&mut self, key: &str, value: &Value) -> Result<()>;

    fn on_obj_start(&mut self, key: &str) -> Result<()> {
        let _ = key;
        Ok(())
    }

    fn on_obj_end(&mut self) -> Result<()> {
        Ok(())
    }
}

fn collect<'a>(ctx: &'a Ctx, out: &mut Vec<&'a Field>) {
    if let Some(b) = &ctx.before {
        collect(b, out);
    }
    out.extend(ctx.local.iter());
    if let Some(a) = &ctx.after {
        collect(a, out);
    }
}

/// Merged depth-first field stream with non-final duplicate keys removed.
///
/// A reverse scan records the last write position per key; the forward pass
/// emits only final occurrences, so a shadowed key surfaces at the position
/// of its effective write.
pub(crate) fn collapsed(ctx: &Ctx) -> Vec<&Field> {
    let mut all = Vec::with_capacity(ctx.len());
    collect(ctx, &mut all);

    let mut last: HashMap<&str, usize> = HashMap::with_capacity(all.len());
    for (i, f) in all.iter().enumerate() {
        last.insert(f.key.as_str(), i);
    }

    all.iter()
        .enumerate()
        .filter(|(i, f)| last[f.key.as_str()] == *i)
        .map(|(_, f)| *f)
        .collect()
}

pub(crate) fn visit_key_values(ctx: &Ctx, v: &mut dyn Visitor) -> Result<()> {
    for field in collapsed(ctx) {
        v.on_value(&field.key, &field.value)?;
    }
    Ok(())
}

enum Node<'a> {
    Leaf(&'a Value),
    Obj(Vec<(&'a str, Node<'a>)>),
}

fn insert<'a>(entries: &mut Vec<(&'a str, Node<'a>)>, segs: &[&'a str], value: &'a Value) {
    let seg = segs[0];
    let pos = entries.iter().position(|(k, _)| *k == seg);

    if segs.len() == 1 {
        match pos {
            // conflict between a scalar and an object at the same node:
            // the later write wins, keeping the earlier position
            Some(i) => entries[i].1 = Node::Leaf(value),
            None => entries.push((seg, Node::Leaf(value))),
        }
        return;
    }

    let idx = match pos {
        Some(i) => i,
        None => {
            entries.push((seg, Node::Obj(Vec::new())));
            entries.len() - 1
        }
    };
    if let Node::Leaf(_) = entries[idx].1 {
        entries[idx].1 = Node::Obj(Vec::new());
    }
    if let Node::Obj(children) = &mut entries[idx].1 {
        insert(children, &segs[1..], value);
    }
}

fn emit(entries: &[(&str, Node<'_>)], v: &mut dyn Visitor) -> Result<()> {
    for (key, node) in entries {
        match node {
            Node::Leaf(value) => v.on_value(key, value)?,
            Node::Obj(children) => {
                v.on_obj_start(key)?;
                emit(children, v)?;
                v.on_obj_end()?;
            }
        }
    }
    Ok(())
}

pub(crate) fn visit_structured(ctx: &Ctx, v: &mut dyn Visitor) -> Result<()> {
    let fields = collapsed(ctx);

    let mut root: Vec<(&str, Node<'_>)> = Vec::new();
    for field in &fields {
        let segs: Vec<&str> = field.key.split('.').collect();
        insert(&mut root, &segs, &field.value);
    }

    emit(&root, v)
}

/// Render a context as the JSON object its structured traversal produces.
pub(crate) fn ctx_to_json(ctx: &Ctx) -> serde_json::Value {
    struct Builder {
        stack: Vec<(String, serde_json::Map<String, serde_json::Value>)>,
        cur: serde_json::Map<String, serde_json::Value>,
    }

    impl Visitor for Builder {
        fn on_value(&mut self, key: &str, value: &Value) -> Result<()> {
            self.cur.insert(key.to_string(), value.to_json_value());
            Ok(())
        }

        fn on_obj_start(&mut self, key: &str) -> Result<()> {
            self.stack
                .push((key.to_string(), std::mem::take(&mut self.cur)));
            Ok(())
        }

        fn on_obj_end(&mut self) -> Result<()> {
            let (key, parent) = self
                .stack
                .pop()
                .expect("object events are balanced by construction");
            let done = std::mem::replace(&mut self.cur, parent);
            self.cur.insert(key, serde_json::Value::Object(done));
            Ok(())
        }
    }

    let mut builder = Builder {
        stack: Vec::new(),
        cur: serde_json::Map::new(),
    };
    // the builder never reports an error
    let _ = visit_structured(ctx, &mut builder);
    serde_json::Value::Object(builder.cur)
}
