//! Bidirectional mapping between RDF terms and generic BERT terms.
//!
//! Every RDF value becomes a tagged tuple whose first field is a
//! one-character atom, except for the three fast paths: booleans travel
//! as the bare atoms `t`/`f`, integers as native integers, and doubles
//! as native 8-byte floats. The mapping is lossless; [`unserialize`] is
//! the exact inverse of [`serialize`] and rejects anything it does not
//! recognize rather than coercing it.
//!
//! A literal carrying both a language and a datatype cannot be produced
//! by the [`Term`] constructors; if one is built by hand, [`serialize`]
//! rejects it rather than picking a side.

use bert_term::Value;

use crate::errors::{Error, Result};
use crate::term::{Pattern, Quad, Term, Triple};

const TAG_VARIABLE: &str = "?";
const TAG_BNODE: &str = ":";
const TAG_URI: &str = "<";
const TAG_PLAIN: &str = "\"";
const TAG_LANG: &str = "@";
const TAG_DATATYPE: &str = "^";
const TAG_TRIPLE: &str = "3";
const TAG_QUAD: &str = "4";

/// Map an RDF term onto its generic tagged representation.
pub fn serialize(term: &Term) -> Result<Value> {
    Ok(match term {
        Term::Variable(name) => tagged2(TAG_VARIABLE, Value::atom(name.clone())),
        Term::BlankNode(id) => tagged2(TAG_BNODE, Value::atom(id.clone())),
        Term::Uri(uri) => tagged2(TAG_URI, Value::string(uri)),
        Term::Literal {
            lexical,
            language,
            datatype,
        } => match (language, datatype) {
            (None, None) => tagged2(TAG_PLAIN, Value::string(lexical)),
            (Some(lang), None) => Value::Tuple(vec![
                Value::atom(TAG_LANG),
                Value::string(lexical),
                Value::atom(lang.clone()),
            ]),
            (None, Some(dt)) => Value::Tuple(vec![
                Value::atom(TAG_DATATYPE),
                Value::string(lexical),
                Value::string(dt),
            ]),
            (Some(_), Some(_)) => {
                return Err(Error::InvalidTermEncoding(
                    "literal with both language and datatype".into(),
                ))
            }
        },
        Term::Boolean(b) => Value::atom(if *b { "t" } else { "f" }),
        Term::Integer(i) => Value::Int(*i),
        Term::Double(d) => Value::Float(*d),
        Term::Triple(t) => serialize_triple(t)?,
    })
}

/// Map a triple onto its `'3'`-tagged tuple.
pub fn serialize_triple(triple: &Triple) -> Result<Value> {
    Ok(Value::Tuple(vec![
        Value::atom(TAG_TRIPLE),
        serialize(&triple.subject)?,
        serialize(&triple.predicate)?,
        serialize(&triple.object)?,
    ]))
}

/// Map a quad onto a `'3'`-tagged tuple (default graph) or a
/// `'4'`-tagged tuple (named graph).
pub fn serialize_quad(quad: &Quad) -> Result<Value> {
    match &quad.context {
        None => serialize_triple(&quad.triple),
        Some(context) => {
            if !context.is_context() {
                return Err(Error::InvalidTermEncoding(format!(
                    "context must be a URI or blank node, got {}",
                    context
                )));
            }
            Ok(Value::Tuple(vec![
                Value::atom(TAG_QUAD),
                serialize(&quad.triple.subject)?,
                serialize(&quad.triple.predicate)?,
                serialize(&quad.triple.object)?,
                serialize(context)?,
            ]))
        }
    }
}

/// Map an optional context; absence travels as `nil`.
pub fn serialize_context(context: &Option<Term>) -> Result<Value> {
    match context {
        None => Ok(Value::Nil),
        Some(term) => {
            if !term.is_context() {
                return Err(Error::InvalidTermEncoding(format!(
                    "context must be a URI or blank node, got {}",
                    term
                )));
            }
            serialize(term)
        }
    }
}

/// Reconstruct an RDF term from its generic representation.
pub fn unserialize(value: &Value) -> Result<Term> {
    match value {
        Value::Atom(name) => match name.as_str() {
            "t" => Ok(Term::Boolean(true)),
            "f" => Ok(Term::Boolean(false)),
            other => Err(invalid(format!("unexpected bare atom '{}'", other))),
        },
        Value::Bool(b) => Ok(Term::Boolean(*b)),
        Value::Int(i) => Ok(Term::Integer(*i)),
        Value::Float(d) => Ok(Term::Double(*d)),
        Value::Tuple(fields) => unserialize_tuple(fields),
        other => Err(invalid(format!("unexpected term shape: {}", other))),
    }
}

fn unserialize_tuple(fields: &[Value]) -> Result<Term> {
    let tag = fields
        .first()
        .and_then(Value::as_atom)
        .ok_or_else(|| invalid("tuple without a leading tag atom".into()))?;
    match (tag, fields.len()) {
        (TAG_VARIABLE, 2) => Ok(Term::Variable(text(&fields[1], "variable name")?)),
        (TAG_BNODE, 2) => Ok(Term::BlankNode(text(&fields[1], "blank node id")?)),
        (TAG_URI, 2) => Ok(Term::Uri(text(&fields[1], "URI")?)),
        (TAG_PLAIN, 2) => Ok(Term::literal(text(&fields[1], "literal")?)),
        (TAG_LANG, 3) => Ok(Term::literal_lang(
            text(&fields[1], "literal")?,
            text(&fields[2], "language tag")?,
        )),
        (TAG_DATATYPE, 3) => Ok(Term::literal_typed(
            text(&fields[1], "literal")?,
            text(&fields[2], "datatype URI")?,
        )),
        (TAG_TRIPLE, 4) => Ok(Term::Triple(Box::new(Triple::new(
            unserialize(&fields[1])?,
            unserialize(&fields[2])?,
            unserialize(&fields[3])?,
        )))),
        (tag, arity) => Err(invalid(format!(
            "unrecognized tag '{}' with arity {}",
            tag, arity
        ))),
    }
}

/// Reconstruct a triple from a `'3'`-tagged tuple.
pub fn unserialize_triple(value: &Value) -> Result<Triple> {
    match unserialize(value)? {
        Term::Triple(t) => Ok(*t),
        other => Err(invalid(format!("expected a triple, got {}", other))),
    }
}

/// Reconstruct a quad from a `'3'`- or `'4'`-tagged tuple.
pub fn unserialize_quad(value: &Value) -> Result<Quad> {
    if let Some(fields) = value.as_tuple() {
        if fields.first().and_then(Value::as_atom) == Some(TAG_QUAD) {
            if fields.len() != 5 {
                return Err(invalid(format!(
                    "quad tuple with arity {}",
                    fields.len()
                )));
            }
            let context = unserialize(&fields[4])?;
            if !context.is_context() {
                return Err(invalid(format!(
                    "context must be a URI or blank node, got {}",
                    context
                )));
            }
            return Ok(Quad::new(
                Triple::new(
                    unserialize(&fields[1])?,
                    unserialize(&fields[2])?,
                    unserialize(&fields[3])?,
                ),
                Some(context),
            ));
        }
    }
    Ok(Quad::default_graph(unserialize_triple(value)?))
}

/// Reconstruct an optional context: `nil` (in either spelling) means
/// the default graph.
pub fn unserialize_context(value: &Value) -> Result<Option<Term>> {
    if is_nil(value) {
        return Ok(None);
    }
    let term = unserialize(value)?;
    if !term.is_context() {
        return Err(invalid(format!(
            "context must be a URI or blank node, got {}",
            term
        )));
    }
    Ok(Some(term))
}

/// Map a pattern onto a `'3'`-tagged tuple with `nil` wildcards. The
/// context is not part of the tuple; it travels as a separate scoping
/// argument.
pub fn serialize_pattern(pattern: &Pattern) -> Result<Value> {
    let position = |p: &Option<Term>| -> Result<Value> {
        match p {
            None => Ok(Value::Nil),
            Some(t) => serialize(t),
        }
    };
    Ok(Value::Tuple(vec![
        Value::atom(TAG_TRIPLE),
        position(&pattern.subject)?,
        position(&pattern.predicate)?,
        position(&pattern.object)?,
    ]))
}

/// Reconstruct a match pattern from a `'3'`-tagged tuple whose
/// positions may be `nil` or variables.
pub fn unserialize_pattern(value: &Value) -> Result<Pattern> {
    let fields = value
        .as_tuple()
        .ok_or_else(|| invalid("pattern must be a tagged tuple".into()))?;
    let tag = fields.first().and_then(Value::as_atom);
    if tag != Some(TAG_TRIPLE) || fields.len() != 4 {
        return Err(invalid("pattern must be a '3'-tagged tuple".into()));
    }
    Ok(Pattern {
        subject: pattern_position(&fields[1])?,
        predicate: pattern_position(&fields[2])?,
        object: pattern_position(&fields[3])?,
        context: None,
    })
}

fn pattern_position(value: &Value) -> Result<Option<Term>> {
    if is_nil(value) {
        return Ok(None);
    }
    Ok(Some(unserialize(value)?))
}

/// Serialize and encode in one step.
pub fn encode(term: &Term) -> Result<Vec<u8>> {
    Ok(bert_term::encode(&serialize(term)?)?)
}

/// Decode and unserialize in one step.
pub fn decode(bytes: &[u8]) -> Result<Term> {
    unserialize(&bert_term::decode(bytes)?)
}

fn is_nil(value: &Value) -> bool {
    value.is_nil() || value.as_atom() == Some("nil")
}

/// Stringly payloads arrive as binaries from most peers, but Erlang
/// callers tend to send atoms; accept both.
fn text(value: &Value, what: &str) -> Result<String> {
    match value {
        Value::Binary(_) => value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| invalid(format!("{} is not UTF-8", what))),
        Value::Atom(name) => Ok(name.clone()),
        other => Err(invalid(format!("{} must be a binary or atom, got {}", what, other))),
    }
}

fn tagged2(tag: &str, payload: Value) -> Value {
    Value::Tuple(vec![Value::atom(tag), payload])
}

fn invalid(msg: String) -> Error {
    Error::InvalidTermEncoding(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(term: Term) {
        let value = serialize(&term).expect("serialize");
        assert_eq!(unserialize(&value).expect("unserialize"), term);
        assert_eq!(decode(&encode(&term).unwrap()).unwrap(), term);
    }

    #[test]
    fn every_variant_roundtrips() {
        roundtrip(Term::variable("foo"));
        roundtrip(Term::blank("foobar"));
        roundtrip(Term::uri("http://purl.org/dc/terms/title"));
        roundtrip(Term::literal("Hello"));
        roundtrip(Term::literal_lang("Hello", "en"));
        roundtrip(Term::literal_typed(
            "Hello",
            "http://www.w3.org/2001/XMLSchema#string",
        ));
        roundtrip(Term::Boolean(true));
        roundtrip(Term::Boolean(false));
        roundtrip(Term::Integer(-12345678901234));
        roundtrip(Term::Double(3.1415));
        roundtrip(Term::Triple(Box::new(Triple::new(
            Term::blank("b0"),
            Term::uri("http://ex/p"),
            Term::Integer(7),
        ))));
    }

    #[test]
    fn blank_node_triple_shape() {
        let triple = Triple::new(
            Term::blank("foobar"),
            Term::uri("http://example/type"),
            Term::uri("http://example/Person"),
        );
        let value = serialize_triple(&triple).unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![
                Value::atom("3"),
                Value::Tuple(vec![Value::atom(":"), Value::atom("foobar")]),
                Value::Tuple(vec![Value::atom("<"), Value::string("http://example/type")]),
                Value::Tuple(vec![
                    Value::atom("<"),
                    Value::string("http://example/Person")
                ]),
            ])
        );
        assert_eq!(unserialize_triple(&value).unwrap(), triple);
    }

    #[test]
    fn language_literal_shape() {
        let value = serialize(&Term::literal_lang("Hello", "en")).unwrap();
        assert_eq!(
            value,
            Value::Tuple(vec![
                Value::atom("@"),
                Value::string("Hello"),
                Value::atom("en"),
            ])
        );
    }

    #[test]
    fn double_is_a_bare_float() {
        let value = serialize(&Term::Double(3.1415)).unwrap();
        assert_eq!(value, Value::Float(3.1415));
    }

    #[test]
    fn double_roundtrip_is_bit_exact() {
        for d in [0.1 + 0.2, f64::MIN_POSITIVE, -1.0 / 3.0, f64::NAN] {
            match decode(&encode(&Term::Double(d)).unwrap()).unwrap() {
                Term::Double(got) => assert_eq!(got.to_bits(), d.to_bits()),
                other => panic!("expected double, got {:?}", other),
            }
        }
    }

    #[test]
    fn booleans_are_bare_atoms() {
        assert_eq!(serialize(&Term::Boolean(true)).unwrap(), Value::atom("t"));
        assert_eq!(serialize(&Term::Boolean(false)).unwrap(), Value::atom("f"));
    }

    #[test]
    fn conflicting_literal_is_rejected() {
        let bad = Term::Literal {
            lexical: "x".into(),
            language: Some("en".into()),
            datatype: Some("http://www.w3.org/2001/XMLSchema#string".into()),
        };
        assert!(matches!(
            serialize(&bad),
            Err(Error::InvalidTermEncoding(_))
        ));
    }

    #[test]
    fn malformed_shapes_are_rejected() {
        for bad in [
            Value::atom("x"),
            Value::List(vec![]),
            Value::Tuple(vec![Value::Int(3)]),
            Value::Tuple(vec![Value::atom("<")]),
            Value::Tuple(vec![Value::atom("@"), Value::string("x")]),
            Value::Tuple(vec![Value::atom("9"), Value::string("x")]),
        ] {
            assert!(
                matches!(unserialize(&bad), Err(Error::InvalidTermEncoding(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn quad_context_is_constrained() {
        let quad = Quad::new(
            Triple::new(Term::blank("s"), Term::uri("http://ex/p"), Term::literal("o")),
            Some(Term::literal("not a graph name")),
        );
        assert!(serialize_quad(&quad).is_err());
        assert!(unserialize_context(&Value::Tuple(vec![
            Value::atom("\""),
            Value::string("nope")
        ]))
        .is_err());
    }

    #[test]
    fn nil_context_means_default_graph() {
        assert_eq!(unserialize_context(&Value::Nil).unwrap(), None);
        assert_eq!(unserialize_context(&Value::atom("nil")).unwrap(), None);
        let ctx = unserialize_context(
            &Value::Tuple(vec![Value::atom("<"), Value::string("http://ex/g")]),
        )
        .unwrap();
        assert_eq!(ctx, Some(Term::uri("http://ex/g")));
    }

    #[test]
    fn patterns_accept_nil_wildcards() {
        let pat = unserialize_pattern(&Value::Tuple(vec![
            Value::atom("3"),
            Value::Nil,
            Value::Tuple(vec![Value::atom("?"), Value::atom("p")]),
            Value::Tuple(vec![Value::atom("\""), Value::string("o")]),
        ]))
        .unwrap();
        assert!(pat.subject.is_none());
        assert_eq!(pat.predicate, Some(Term::variable("p")));
        assert_eq!(pat.object, Some(Term::literal("o")));
    }
}
