//! The context tree
//!
//! A `Ctx` is a node holding an ordered list of local fields plus optional
//! `before` and `after` snapshots of other contexts. Construction snapshots
//! the referenced nodes, so a child never observes later writes to its
//! parent; any number of derived contexts may share one frozen ancestor
//! without synchronization. Mutation requires `&mut self`, which makes the
//! owner-only write rule a compile-time guarantee.
//!
//! Duplicate keys are kept in storage. Collapsing duplicates to the last
//! write in depth-first `before, local, after` order is a traversal-time
//! behavior, shared by the flat and structured visitors.

use std::sync::Arc;

use super::arg::Arg;
use super::error::Result;
use super::field::Field;
use super::value::Value;
use super::visitor::{self, Visitor};

#[derive(Debug, Clone, Default)]
pub struct Ctx {
    pub(crate) before: Option<Arc<Ctx>>,
    pub(crate) after: Option<Arc<Ctx>>,
    pub(crate) local: Vec<Field>,
    pub(crate) tot_user: usize,
    pub(crate) tot_std: usize,
}

impl Ctx {
    /// Create a context whose field stream starts with a snapshot of
    /// `before` and ends with a snapshot of `after`.
    ///
    /// Fields of `after` shadow local writes and `before` writes for the
    /// same key; local writes shadow `before`.
    pub fn new(before: Option<&Ctx>, after: Option<&Ctx>) -> Ctx {
        let mut ctx = Ctx {
            before: before.map(|c| Arc::new(c.clone())),
            after: after.map(|c| Arc::new(c.clone())),
            local: Vec::new(),
            tot_user: 0,
            tot_std: 0,
        };
        ctx.recount();
        ctx
    }

    /// Total number of stored fields across `before`, `local`, and `after`.
    /// Shadowed duplicates count; they are still stored.
    pub fn len(&self) -> usize {
        self.tot_user + self.tot_std
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored user (non-standardized) fields in the subtree.
    pub fn user_len(&self) -> usize {
        self.tot_user
    }

    /// Number of stored standardized fields in the subtree.
    pub fn standardized_len(&self) -> usize {
        self.tot_std
    }

    /// Append a user field.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.add_field(Field::new(key, value));
    }

    /// Append a pre-built field, keeping its user/standardized class.
    pub fn add_field(&mut self, field: Field) {
        if field.standardized {
            self.tot_std += 1;
        } else {
            self.tot_user += 1;
        }
        self.local.push(field);
    }

    /// Append a sequence of pre-built fields in order.
    pub fn add_fields(&mut self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            self.add_field(field);
        }
    }

    /// Heterogeneous ingest: alternating `(key, value)` pairs with pre-built
    /// fields interleaved in any order. A field consumes one slot; a string
    /// consumes two (itself plus the following value).
    ///
    /// Malformed input recovers locally: a dangling trailing key is stored
    /// with a null payload, and a value in key position is stored under its
    /// positional index.
    pub fn add_all(&mut self, args: impl IntoIterator<Item = Arg>) {
        let mut it = args.into_iter();
        let mut slot = 0usize;
        while let Some(arg) = it.next() {
            match arg {
                Arg::Field(f) => {
                    self.add_field(f);
                    slot += 1;
                }
                Arg::Value(Value::Str(key)) => {
                    slot += 1;
                    match it.next() {
                        Some(value_arg) => {
                            slot += 1;
                            let value = match value_arg {
                                Arg::Value(v) => v,
                                Arg::Field(f) => f.value,
                                Arg::Err(e) => Value::Str(e.to_string()),
                            };
                            self.add(key, value);
                        }
                        None => self.add(key, Value::Any(serde_json::Value::Null)),
                    }
                }
                Arg::Value(v) => {
                    self.add(slot.to_string(), v);
                    slot += 1;
                }
                Arg::Err(e) => {
                    self.add(slot.to_string(), Value::Str(e.to_string()));
                    slot += 1;
                }
            }
        }
    }

    /// View of the local fields only; `before` and `after` are ignored.
    pub fn local(&self) -> Ctx {
        let mut ctx = Ctx {
            before: None,
            after: None,
            local: self.local.clone(),
            tot_user: 0,
            tot_std: 0,
        };
        ctx.recount();
        ctx
    }

    /// Transitive view of the user fields.
    pub fn user(&self) -> Ctx {
        self.filtered(false)
    }

    /// Transitive view of the standardized fields.
    pub fn standardized(&self) -> Ctx {
        self.filtered(true)
    }

    fn filtered(&self, standardized: bool) -> Ctx {
        let before = self
            .before
            .as_ref()
            .map(|b| b.filtered(standardized))
            .filter(|c| !c.is_empty())
            .map(Arc::new);
        let after = self
            .after
            .as_ref()
            .map(|a| a.filtered(standardized))
            .filter(|c| !c.is_empty())
            .map(Arc::new);
        let local: Vec<Field> = self
            .local
            .iter()
            .filter(|f| f.standardized == standardized)
            .cloned()
            .collect();

        let mut ctx = Ctx {
            before,
            after,
            local,
            tot_user: 0,
            tot_std: 0,
        };
        ctx.recount();
        ctx
    }

    fn recount(&mut self) {
        let mut user = 0;
        let mut std = 0;
        if let Some(b) = &self.before {
            user += b.tot_user;
            std += b.tot_std;
        }
        for f in &self.local {
            if f.standardized {
                std += 1;
            } else {
                user += 1;
            }
        }
        if let Some(a) = &self.after {
            user += a.tot_user;
            std += a.tot_std;
        }
        self.tot_user = user;
        self.tot_std = std;
    }

    /// Stream the merged fields as `(dotted_key, value)` events in
    /// depth-first order with duplicates collapsed to the last write.
    pub fn visit_key_values(&self, v: &mut dyn Visitor) -> Result<()> {
        visitor::visit_key_values(self, v)
    }

    /// Stream the merged fields as a nested object graph derived from the
    /// dotted key paths.
    pub fn visit_structured(&self, v: &mut dyn Visitor) -> Result<()> {
        visitor::visit_structured(self, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ctx() {
        let ctx = Ctx::new(None, None);
        assert_eq!(ctx.len(), 0);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_counters_track_field_class() {
        let mut ctx = Ctx::new(None, None);
        ctx.add_field(Field::str("hello", "world"));
        assert_eq!(ctx.tot_user, 1);
        assert_eq!(ctx.tot_std, 0);

        ctx.add_field(Field::std("host.hostname", "box"));
        assert_eq!(ctx.tot_user, 1);
        assert_eq!(ctx.tot_std, 1);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_duplicate_keys_are_stored() {
        let mut ctx = Ctx::new(None, None);
        ctx.add_fields([Field::int("key", 1), Field::int("key", 2)]);
        // both writes count; collapse happens at traversal time
        assert_eq!(ctx.tot_user, 2);
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_len_sums_before_local_after() {
        let mut before = Ctx::new(None, None);
        before.add("a", 1);
        let mut after = Ctx::new(None, None);
        after.add("b", 2);

        let mut ctx = Ctx::new(Some(&before), Some(&after));
        ctx.add("c", 3);
        assert_eq!(ctx.len(), 3);
        assert_eq!(
            ctx.len(),
            before.len() + ctx.local.len() + after.len()
        );
    }

    #[test]
    fn test_snapshot_isolation() {
        let mut parent = Ctx::new(None, None);
        parent.add("a", 1);

        let child = Ctx::new(Some(&parent), None);
        parent.add("b", 2);

        assert_eq!(child.len(), 1);
        assert_eq!(parent.len(), 2);
    }

    #[test]
    fn test_add_all_dangling_key_kept() {
        let mut ctx = Ctx::new(None, None);
        ctx.add_all([Arg::from("lonely")]);
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.local[0].key, "lonely");
        assert!(matches!(
            ctx.local[0].value,
            Value::Any(serde_json::Value::Null)
        ));
    }

    #[test]
    fn test_add_all_value_in_key_position() {
        let mut ctx = Ctx::new(None, None);
        ctx.add_all([Arg::from(7_i32)]);
        assert_eq!(ctx.local[0].key, "0");
    }

    #[test]
    fn test_filter_counts() {
        let mut ctx = Ctx::new(None, None);
        ctx.add_field(Field::str("user", "x"));
        ctx.add_field(Field::std("std", "y"));

        assert_eq!(ctx.user().len(), 1);
        assert_eq!(ctx.standardized().len(), 1);
    }
}
