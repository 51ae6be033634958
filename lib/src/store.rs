//! The storage seam consumed by the protocol layer.

use std::collections::HashSet;
use std::sync::RwLock;

use crate::term::{Pattern, Quad, Term};

/// A mutable set of quads partitioned by context.
///
/// Implementations serialize their own writes; callers invoke these
/// methods concurrently without taking locks of their own. Insert and
/// delete are idempotent set operations.
pub trait GraphStore: Send + Sync {
    /// True when no quads are stored in any graph.
    fn is_empty(&self) -> bool;
    /// Total quad count across all graphs.
    fn len(&self) -> u64;
    /// Distinct named-graph contexts in use. The default graph is
    /// implicit and never listed.
    fn contexts(&self) -> Vec<Term>;
    /// Distinct subjects across the entire store.
    fn distinct_subjects(&self) -> Vec<Term>;
    /// Distinct predicates across the entire store.
    fn distinct_predicates(&self) -> Vec<Term>;
    /// Exact membership test.
    fn contains(&self, quad: &Quad) -> bool;
    /// All quads satisfying `pattern`.
    fn matching(&self, pattern: &Pattern) -> Vec<Quad>;
    /// Add a quad; adding an existing quad is a no-op.
    fn insert(&self, quad: Quad);
    /// Remove a quad; removing an absent quad is a no-op.
    fn delete(&self, quad: &Quad);
    /// Remove every quad in every graph.
    fn clear_all(&self);
}

/// In-memory [`GraphStore`] backed by a hash set under a `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    quads: RwLock<HashSet<Quad>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl GraphStore for MemoryStore {
    fn is_empty(&self) -> bool {
        self.quads.read().unwrap().is_empty()
    }

    fn len(&self) -> u64 {
        self.quads.read().unwrap().len() as u64
    }

    fn contexts(&self) -> Vec<Term> {
        let quads = self.quads.read().unwrap();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in quads.iter() {
            if let Some(c) = &q.context {
                if seen.insert(c.clone()) {
                    out.push(c.clone());
                }
            }
        }
        out
    }

    fn distinct_subjects(&self) -> Vec<Term> {
        self.distinct_position(|q| &q.triple.subject)
    }

    fn distinct_predicates(&self) -> Vec<Term> {
        self.distinct_position(|q| &q.triple.predicate)
    }

    fn contains(&self, quad: &Quad) -> bool {
        self.quads.read().unwrap().contains(quad)
    }

    fn matching(&self, pattern: &Pattern) -> Vec<Quad> {
        self.quads
            .read()
            .unwrap()
            .iter()
            .filter(|q| pattern.matches(q))
            .cloned()
            .collect()
    }

    fn insert(&self, quad: Quad) {
        self.quads.write().unwrap().insert(quad);
    }

    fn delete(&self, quad: &Quad) {
        self.quads.write().unwrap().remove(quad);
    }

    fn clear_all(&self) {
        self.quads.write().unwrap().clear();
    }
}

impl MemoryStore {
    fn distinct_position<F>(&self, pick: F) -> Vec<Term>
    where
        F: Fn(&Quad) -> &Term,
    {
        let quads = self.quads.read().unwrap();
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for q in quads.iter() {
            let term = pick(q);
            if seen.insert(term.clone()) {
                out.push(term.clone());
            }
        }
        out
    }
}
