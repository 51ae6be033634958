//! RDF terms, triples, quads, and match patterns.
//!
//! [`Term`] is a closed union of every value that can cross the wire:
//! resource terms (URIs, blank nodes), literals (with the boolean,
//! integer, and double fast paths modeled as their own variants), query
//! variables, and nested triples. Equality and hashing are total
//! (doubles compare by their IEEE-754 bit pattern), so quads can live
//! in hash sets and encode/decode preserves every constructible term.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::discriminant;

/// A single RDF value.
#[derive(Debug, Clone)]
pub enum Term {
    /// Absolute URI reference.
    Uri(String),
    /// Blank node label (no `_:` prefix).
    BlankNode(String),
    /// Generic literal; `language` and `datatype` are mutually
    /// exclusive, absence of both means a plain literal. Use the
    /// constructors rather than building this variant by hand.
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<String>,
    },
    /// Boolean literal; travels as a bare one-character atom.
    Boolean(bool),
    /// Integer literal; travels as a native integer.
    Integer(i64),
    /// Double literal; travels as a native 8-byte float.
    Double(f64),
    /// Query variable. Only valid inside patterns, never in stored data.
    Variable(String),
    /// Nested triple term.
    Triple(Box<Triple>),
}

impl Term {
    pub fn uri<S: Into<String>>(uri: S) -> Self {
        Term::Uri(uri.into())
    }

    pub fn blank<S: Into<String>>(id: S) -> Self {
        Term::BlankNode(id.into())
    }

    /// Plain literal with neither language nor datatype.
    pub fn literal<S: Into<String>>(lexical: S) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged literal.
    pub fn literal_lang<S: Into<String>, L: Into<String>>(lexical: S, language: L) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: Some(language.into()),
            datatype: None,
        }
    }

    /// Datatyped literal.
    pub fn literal_typed<S: Into<String>, D: Into<String>>(lexical: S, datatype: D) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    pub fn variable<S: Into<String>>(name: S) -> Self {
        Term::Variable(name.into())
    }

    /// True for terms allowed as a graph context: URIs and blank nodes.
    pub fn is_context(&self) -> bool {
        matches!(self, Term::Uri(_) | Term::BlankNode(_))
    }

    /// True for query variables.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        use Term::*;
        match (self, other) {
            (Uri(a), Uri(b)) => a == b,
            (BlankNode(a), BlankNode(b)) => a == b,
            (
                Literal {
                    lexical: la,
                    language: ga,
                    datatype: da,
                },
                Literal {
                    lexical: lb,
                    language: gb,
                    datatype: db,
                },
            ) => la == lb && ga == gb && da == db,
            (Boolean(a), Boolean(b)) => a == b,
            (Integer(a), Integer(b)) => a == b,
            // Bit identity, so NaN == NaN and the equality stays total.
            (Double(a), Double(b)) => a.to_bits() == b.to_bits(),
            (Variable(a), Variable(b)) => a == b,
            (Triple(a), Triple(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Term {}

impl Hash for Term {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(self).hash(state);
        match self {
            Term::Uri(s) | Term::BlankNode(s) | Term::Variable(s) => s.hash(state),
            Term::Literal {
                lexical,
                language,
                datatype,
            } => {
                lexical.hash(state);
                language.hash(state);
                datatype.hash(state);
            }
            Term::Boolean(b) => b.hash(state),
            Term::Integer(i) => i.hash(state),
            Term::Double(d) => d.to_bits().hash(state),
            Term::Triple(t) => t.hash(state),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Uri(u) => write!(f, "<{}>", u),
            Term::BlankNode(id) => write!(f, "_:{}", id),
            Term::Literal {
                lexical,
                language,
                datatype,
            } => {
                write!(f, "{:?}", lexical)?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)?;
                }
                if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)?;
                }
                Ok(())
            }
            Term::Boolean(b) => write!(f, "{}", b),
            Term::Integer(i) => write!(f, "{}", i),
            Term::Double(d) => write!(f, "{:e}", d),
            Term::Variable(name) => write!(f, "?{}", name),
            Term::Triple(t) => write!(f, "<<{}>>", t),
        }
    }
}

/// Subject, predicate, object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)
    }
}

/// A triple plus an optional graph context. `None` is the default graph.
///
/// A present context is always a URI or blank node; the codec enforces
/// this when quads cross the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub triple: Triple,
    pub context: Option<Term>,
}

impl Quad {
    pub fn new(triple: Triple, context: Option<Term>) -> Self {
        Quad { triple, context }
    }

    /// Triple in the default graph.
    pub fn default_graph(triple: Triple) -> Self {
        Quad {
            triple,
            context: None,
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(c) => write!(f, "{} {}", self.triple, c),
            None => write!(f, "{}", self.triple),
        }
    }
}

/// A quad template used for matching. `None` in a term position is a
/// wildcard, as is a [`Term::Variable`]; `None` in the context position
/// restricts the match to the default graph.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
    pub context: Option<Term>,
}

impl Pattern {
    /// Wildcard pattern over the default graph.
    pub fn any() -> Self {
        Pattern::default()
    }

    /// Exact pattern for one triple, scoped by `context`.
    pub fn from_triple(triple: &Triple, context: Option<Term>) -> Self {
        Pattern {
            subject: Some(triple.subject.clone()),
            predicate: Some(triple.predicate.clone()),
            object: Some(triple.object.clone()),
            context,
        }
    }

    /// Rescope this pattern to `context`.
    pub fn with_context(mut self, context: Option<Term>) -> Self {
        self.context = context;
        self
    }

    /// True if `quad` satisfies every bound position of this pattern.
    pub fn matches(&self, quad: &Quad) -> bool {
        position_matches(&self.subject, &quad.triple.subject)
            && position_matches(&self.predicate, &quad.triple.predicate)
            && position_matches(&self.object, &quad.triple.object)
            && self.context == quad.context
    }
}

fn position_matches(pattern: &Option<Term>, value: &Term) -> bool {
    match pattern {
        None => true,
        Some(Term::Variable(_)) => true,
        Some(t) => t == value,
    }
}
