//! The `rdf` command set: named operations over a [`GraphStore`].
//!
//! Each operation takes its arguments as decoded generic terms and
//! produces one generic term as its result. Dispatch is a lookup in the
//! static [`OPERATIONS`] table; there is no registration step and no
//! introspection.
//!
//! Context scoping is uniform: the first argument of the per-triple
//! operations is a context that scopes every triple in the call, and an
//! absent (`nil`) context means the default graph. `subjects`,
//! `predicates`, `empty?`, `count`, and `clear` operate on the whole
//! store only and report [`Error::UnsupportedScope`] when a caller asks
//! for a named-graph restriction.
//!
//! Multi-triple calls apply each triple independently: they are not
//! transactions. If a later argument fails to decode, the request
//! errors but triples already applied stay applied.

use bert_term::Value;

use crate::codec;
use crate::errors::{Error, Result};
use crate::store::GraphStore;
use crate::term::{Quad, Term};

/// BERT-RPC module name the operations are registered under.
pub const MODULE: &str = "rdf";

/// Protocol version triple, taken from the crate version.
pub fn version() -> (i64, i64, i64) {
    let parse = |s: &str| s.parse::<i64>().unwrap_or(0);
    (
        parse(env!("CARGO_PKG_VERSION_MAJOR")),
        parse(env!("CARGO_PKG_VERSION_MINOR")),
        parse(env!("CARGO_PKG_VERSION_PATCH")),
    )
}

/// Signature shared by every operation handler.
pub type Handler = fn(&dyn GraphStore, &[Value]) -> Result<Value>;

/// Operation name to handler, in protocol order.
pub const OPERATIONS: &[(&str, Handler)] = &[
    ("version", op_version),
    ("contexts", op_contexts),
    ("subjects", op_subjects),
    ("predicates", op_predicates),
    ("empty?", op_empty),
    ("count", op_count),
    ("clear", op_clear),
    ("exist?", op_exist),
    ("known?", op_known),
    ("query", op_query),
    ("insert", op_insert),
    ("delete", op_delete),
];

/// Invoke the named operation, or fail with `UnknownOperation`.
pub fn dispatch(store: &dyn GraphStore, operation: &str, args: &[Value]) -> Result<Value> {
    match OPERATIONS.iter().find(|(name, _)| *name == operation) {
        Some((_, handler)) => handler(store, args),
        None => Err(Error::UnknownOperation(operation.to_string())),
    }
}

fn op_version(_store: &dyn GraphStore, _args: &[Value]) -> Result<Value> {
    let (major, minor, patch) = version();
    Ok(Value::List(vec![
        Value::Int(major),
        Value::Int(minor),
        Value::Int(patch),
    ]))
}

fn op_contexts(store: &dyn GraphStore, _args: &[Value]) -> Result<Value> {
    let contexts = store
        .contexts()
        .iter()
        .map(codec::serialize)
        .collect::<Result<Vec<_>>>()?;
    Ok(Value::List(contexts))
}

fn op_subjects(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    global_only(args, "rdf:subjects")?;
    serialized_terms(store.distinct_subjects())
}

fn op_predicates(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    global_only(args, "rdf:predicates")?;
    serialized_terms(store.distinct_predicates())
}

fn op_empty(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    global_only(args, "rdf:empty?")?;
    Ok(Value::Bool(store.is_empty()))
}

fn op_count(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    global_only(args, "rdf:count")?;
    Ok(Value::Int(store.len() as i64))
}

fn op_clear(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    global_only(args, "rdf:clear")?;
    store.clear_all();
    Ok(Value::Bool(true))
}

fn op_exist(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    let (context, triples) = context_and_rest(args)?;
    // Short-circuits: later triples are not examined after a miss.
    for value in triples {
        if !store.contains(&scoped_quad(&context, value)?) {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn op_known(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    let (context, triples) = context_and_rest(args)?;
    let mut results = Vec::with_capacity(triples.len());
    for value in triples {
        results.push(Value::Bool(store.contains(&scoped_quad(&context, value)?)));
    }
    Ok(Value::List(results))
}

fn op_query(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    let (context, patterns) = context_and_rest(args)?;
    let mut results = Vec::new();
    for value in patterns {
        let pattern = codec::unserialize_pattern(value)?.with_context(context.clone());
        for quad in store.matching(&pattern) {
            results.push(codec::serialize_triple(&quad.triple)?);
        }
    }
    Ok(Value::List(results))
}

fn op_insert(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    let (context, triples) = context_and_rest(args)?;
    for value in triples {
        store.insert(scoped_quad(&context, value)?);
    }
    Ok(Value::Bool(true))
}

fn op_delete(store: &dyn GraphStore, args: &[Value]) -> Result<Value> {
    let (context, triples) = context_and_rest(args)?;
    for value in triples {
        store.delete(&scoped_quad(&context, value)?);
    }
    Ok(Value::Bool(true))
}

fn global_only(args: &[Value], op: &'static str) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(Error::UnsupportedScope(op))
    }
}

fn context_and_rest(args: &[Value]) -> Result<(Option<Term>, &[Value])> {
    match args.split_first() {
        Some((context, rest)) => Ok((codec::unserialize_context(context)?, rest)),
        None => Err(Error::InvalidTermEncoding(
            "missing context argument".into(),
        )),
    }
}

/// Decode one triple argument and scope it by the call's context. A
/// present context overrides any context embedded in a `'4'` tuple;
/// an absent one leaves the embedded context (or the default graph)
/// in place.
fn scoped_quad(context: &Option<Term>, value: &Value) -> Result<Quad> {
    let mut quad = codec::unserialize_quad(value)?;
    if context.is_some() {
        quad.context = context.clone();
    }
    Ok(quad)
}

fn serialized_terms(terms: Vec<Term>) -> Result<Value> {
    Ok(Value::List(
        terms
            .iter()
            .map(codec::serialize)
            .collect::<Result<Vec<_>>>()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::term::{Pattern, Triple};

    fn triple_value(s: &str, o: &str) -> Value {
        codec::serialize_triple(&triple(s, o)).unwrap()
    }

    fn triple(s: &str, o: &str) -> Triple {
        Triple::new(Term::uri(s), Term::uri("http://ex/p"), Term::literal(o))
    }

    fn context_value(uri: &str) -> Value {
        codec::serialize(&Term::uri(uri)).unwrap()
    }

    #[test]
    fn unknown_operation_is_an_error() {
        let store = MemoryStore::new();
        assert!(matches!(
            dispatch(&store, "frobnicate", &[]),
            Err(Error::UnknownOperation(_))
        ));
    }

    #[test]
    fn version_is_a_three_int_list() {
        let store = MemoryStore::new();
        let v = dispatch(&store, "version", &[]).unwrap();
        let elems = v.as_list().unwrap();
        assert_eq!(elems.len(), 3);
        assert!(elems.iter().all(|e| e.as_int().is_some()));
    }

    #[test]
    fn global_operations_reject_scoping() {
        let store = MemoryStore::new();
        for op in ["subjects", "predicates", "empty?", "count", "clear"] {
            assert!(matches!(
                dispatch(&store, op, &[context_value("http://ex/g")]),
                Err(Error::UnsupportedScope(_))
            ));
        }
    }

    #[test]
    fn insert_then_query_in_default_graph() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[Value::Nil, triple_value("http://ex/s", "o")],
        )
        .unwrap();
        let wildcard = Value::Tuple(vec![Value::atom("3"), Value::Nil, Value::Nil, Value::Nil]);
        let results = dispatch(&store, "query", &[Value::Nil, wildcard]).unwrap();
        assert_eq!(
            results.as_list().unwrap(),
            &[triple_value("http://ex/s", "o")]
        );
    }

    #[test]
    fn named_graph_insert_is_invisible_to_default_graph_query() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[context_value("http://ex/g"), triple_value("http://ex/s", "o")],
        )
        .unwrap();
        let wildcard = Value::Tuple(vec![Value::atom("3"), Value::Nil, Value::Nil, Value::Nil]);
        let results = dispatch(&store, "query", &[Value::Nil, wildcard.clone()]).unwrap();
        assert!(results.as_list().unwrap().is_empty());
        // Scoped to the graph, the triple is there.
        let results = dispatch(
            &store,
            "query",
            &[context_value("http://ex/g"), wildcard],
        )
        .unwrap();
        assert_eq!(results.as_list().unwrap().len(), 1);
    }

    #[test]
    fn exist_requires_every_triple() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[Value::Nil, triple_value("http://ex/s", "present")],
        )
        .unwrap();
        let v = dispatch(
            &store,
            "exist?",
            &[
                Value::Nil,
                triple_value("http://ex/s", "present"),
                triple_value("http://ex/s", "absent"),
            ],
        )
        .unwrap();
        assert_eq!(v.as_bool(), Some(false));
        let v = dispatch(
            &store,
            "exist?",
            &[Value::Nil, triple_value("http://ex/s", "present")],
        )
        .unwrap();
        assert_eq!(v.as_bool(), Some(true));
    }

    /// Store stub that panics on `contains`, proving `exist?` stops at
    /// the first miss.
    struct FirstMissStore {
        calls: std::sync::atomic::AtomicUsize,
    }

    impl GraphStore for FirstMissStore {
        fn is_empty(&self) -> bool {
            true
        }
        fn len(&self) -> u64 {
            0
        }
        fn contexts(&self) -> Vec<Term> {
            Vec::new()
        }
        fn distinct_subjects(&self) -> Vec<Term> {
            Vec::new()
        }
        fn distinct_predicates(&self) -> Vec<Term> {
            Vec::new()
        }
        fn contains(&self, _quad: &Quad) -> bool {
            let n = self
                .calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            if n > 0 {
                panic!("exist? checked a triple after the first miss");
            }
            false
        }
        fn matching(&self, _pattern: &Pattern) -> Vec<Quad> {
            Vec::new()
        }
        fn insert(&self, _quad: Quad) {}
        fn delete(&self, _quad: &Quad) {}
        fn clear_all(&self) {}
    }

    #[test]
    fn exist_short_circuits_on_first_miss() {
        let store = FirstMissStore {
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let v = dispatch(
            &store,
            "exist?",
            &[
                Value::Nil,
                triple_value("http://ex/a", "x"),
                triple_value("http://ex/b", "y"),
            ],
        )
        .unwrap();
        assert_eq!(v.as_bool(), Some(false));
    }

    #[test]
    fn known_checks_every_triple() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[Value::Nil, triple_value("http://ex/s", "present")],
        )
        .unwrap();
        let v = dispatch(
            &store,
            "known?",
            &[
                Value::Nil,
                triple_value("http://ex/s", "absent"),
                triple_value("http://ex/s", "present"),
            ],
        )
        .unwrap();
        assert_eq!(
            v.as_list().unwrap(),
            &[Value::Bool(false), Value::Bool(true)]
        );
    }

    #[test]
    fn batch_is_not_atomic() {
        let store = MemoryStore::new();
        let err = dispatch(
            &store,
            "insert",
            &[
                Value::Nil,
                triple_value("http://ex/s", "first"),
                Value::atom("garbage"),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTermEncoding(_)));
        // The well-formed triple before the bad one was applied.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_then_count() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[Value::Nil, triple_value("http://ex/s", "o")],
        )
        .unwrap();
        dispatch(
            &store,
            "delete",
            &[Value::Nil, triple_value("http://ex/s", "o")],
        )
        .unwrap();
        // Deleting again is a no-op, not an error.
        dispatch(
            &store,
            "delete",
            &[Value::Nil, triple_value("http://ex/s", "o")],
        )
        .unwrap();
        let v = dispatch(&store, "count", &[]).unwrap();
        assert_eq!(v.as_int(), Some(0));
    }

    #[test]
    fn contexts_lists_named_graphs_only() {
        let store = MemoryStore::new();
        dispatch(
            &store,
            "insert",
            &[Value::Nil, triple_value("http://ex/s", "o")],
        )
        .unwrap();
        dispatch(
            &store,
            "insert",
            &[context_value("http://ex/g"), triple_value("http://ex/s", "o")],
        )
        .unwrap();
        let v = dispatch(&store, "contexts", &[]).unwrap();
        assert_eq!(v.as_list().unwrap(), &[context_value("http://ex/g")]);
    }
}
