//! BERT-RPC client stub for remote `rdf` services.
//!
//! The stub follows the BERT-RPC service convention of one connection
//! per request: each `call` or `cast` dials the server, exchanges one
//! frame pair, and closes. Typed convenience methods wrap the raw call
//! interface and decode results against the expected shapes, reporting
//! [`Error::InvalidTermEncoding`] when a response does not fit and
//! [`Error::Remote`] when the server reports a fault.

use std::net::TcpStream;

use bert_term::{read_frame, write_frame, Value};
use log::debug;

use crate::codec;
use crate::errors::{Error, Result};
use crate::protocol::MODULE;
use crate::term::{Pattern, Quad, Term, Triple};

/// Handle on a remote RDF repository.
#[derive(Debug, Clone)]
pub struct Client {
    addr: String,
}

impl Client {
    /// Address in `host:port` form; no connection is made yet.
    pub fn new<A: Into<String>>(addr: A) -> Self {
        Client { addr: addr.into() }
    }

    /// Synchronous call: send `{call, rdf, Fun, Args}`, await the reply.
    pub fn call(&self, function: &str, args: Vec<Value>) -> Result<Value> {
        match self.exchange("call", function, args)? {
            Response::Reply(value) => Ok(value),
            Response::NoReply => Err(Error::InvalidTermEncoding(
                "unexpected noreply to a call".into(),
            )),
        }
    }

    /// Fire-and-forget call: send `{cast, ...}`, await `{noreply}`.
    pub fn cast(&self, function: &str, args: Vec<Value>) -> Result<()> {
        match self.exchange("cast", function, args)? {
            Response::NoReply => Ok(()),
            Response::Reply(_) => Err(Error::InvalidTermEncoding(
                "unexpected reply to a cast".into(),
            )),
        }
    }

    fn exchange(&self, kind: &str, function: &str, args: Vec<Value>) -> Result<Response> {
        debug!("{} {}:{} -> {}", kind, MODULE, function, self.addr);
        let request = Value::Tuple(vec![
            Value::atom(kind),
            Value::atom(MODULE),
            Value::atom(function),
            Value::List(args),
        ]);
        let mut stream = TcpStream::connect(&self.addr)?;
        write_frame(&mut stream, &bert_term::encode(&request)?)?;
        let response = bert_term::decode(&read_frame(&mut stream)?)?;
        decode_response(response)
    }

    /// Protocol version triple of the remote service.
    pub fn version(&self) -> Result<(i64, i64, i64)> {
        let v = self.call("version", vec![])?;
        let elems = v
            .as_list()
            .ok_or_else(|| bad_shape("version must be a list"))?;
        match elems {
            [a, b, c] => Ok((
                expect_int(a)?,
                expect_int(b)?,
                expect_int(c)?,
            )),
            _ => Err(bad_shape("version must have three elements")),
        }
    }

    /// True when the remote store holds no statements.
    pub fn is_empty(&self) -> Result<bool> {
        expect_bool(&self.call("empty?", vec![])?)
    }

    /// Total statement count across all graphs.
    pub fn count(&self) -> Result<i64> {
        expect_int(&self.call("count", vec![])?)
    }

    /// Named-graph contexts in use on the remote store.
    pub fn contexts(&self) -> Result<Vec<Term>> {
        term_list(&self.call("contexts", vec![])?)
    }

    /// Distinct subjects across the whole remote store.
    pub fn subjects(&self) -> Result<Vec<Term>> {
        term_list(&self.call("subjects", vec![])?)
    }

    /// Distinct predicates across the whole remote store.
    pub fn predicates(&self) -> Result<Vec<Term>> {
        term_list(&self.call("predicates", vec![])?)
    }

    /// True when the remote store contains `quad`.
    pub fn contains(&self, quad: &Quad) -> Result<bool> {
        let args = vec![
            codec::serialize_context(&quad.context)?,
            codec::serialize_triple(&quad.triple)?,
        ];
        expect_bool(&self.call("exist?", args)?)
    }

    /// Per-triple membership under one context, no short-circuit.
    pub fn known(&self, context: Option<&Term>, triples: &[Triple]) -> Result<Vec<bool>> {
        let v = self.call("known?", scoped_args(context, triples)?)?;
        v.as_list()
            .ok_or_else(|| bad_shape("known? must return a list"))?
            .iter()
            .map(expect_bool)
            .collect()
    }

    /// Insert `triples` under `context` (`None` = default graph).
    pub fn insert(&self, context: Option<&Term>, triples: &[Triple]) -> Result<()> {
        self.call("insert", scoped_args(context, triples)?)?;
        Ok(())
    }

    /// Delete `triples` under `context`; absent quads are no-ops.
    pub fn delete(&self, context: Option<&Term>, triples: &[Triple]) -> Result<()> {
        self.call("delete", scoped_args(context, triples)?)?;
        Ok(())
    }

    /// Remove every statement in every graph.
    pub fn clear(&self) -> Result<()> {
        self.call("clear", vec![])?;
        Ok(())
    }

    /// Match `pattern` against the remote store, scoped by `context`.
    pub fn query(&self, context: Option<&Term>, pattern: &Pattern) -> Result<Vec<Triple>> {
        let args = vec![
            codec::serialize_context(&context.cloned())?,
            codec::serialize_pattern(pattern)?,
        ];
        let v = self.call("query", args)?;
        v.as_list()
            .ok_or_else(|| bad_shape("query must return a list"))?
            .iter()
            .map(codec::unserialize_triple)
            .collect()
    }

    /// Every statement on the remote store: the default graph first,
    /// then each named graph, with contexts stitched back on.
    pub fn statements(&self) -> Result<Vec<Quad>> {
        let mut graphs = vec![None];
        graphs.extend(self.contexts()?.into_iter().map(Some));
        let mut out = Vec::new();
        for context in graphs {
            for triple in self.query(context.as_ref(), &Pattern::any())? {
                out.push(Quad::new(triple, context.clone()));
            }
        }
        Ok(out)
    }
}

enum Response {
    Reply(Value),
    NoReply,
}

fn decode_response(response: Value) -> Result<Response> {
    let fields = response
        .as_tuple()
        .ok_or_else(|| bad_shape("response must be a tuple"))?;
    match (fields.first().and_then(Value::as_atom), fields.len()) {
        (Some("reply"), 2) => Ok(Response::Reply(fields[1].clone())),
        (Some("noreply"), 1) => Ok(Response::NoReply),
        (Some("error"), 2) => Err(remote_error(&fields[1])),
        _ => Err(bad_shape("response is neither reply, noreply, nor error")),
    }
}

fn remote_error(detail: &Value) -> Error {
    let fields = match detail.as_tuple() {
        Some(f) if f.len() == 5 => f,
        _ => {
            return Error::Remote {
                kind: "unknown".into(),
                code: 0,
                class: String::new(),
                detail: detail.to_string(),
            }
        }
    };
    Error::Remote {
        kind: fields[0].as_atom().unwrap_or("unknown").to_string(),
        code: fields[1].as_int().unwrap_or(0),
        class: fields[2].as_str().unwrap_or("").to_string(),
        detail: fields[3].as_str().unwrap_or("").to_string(),
    }
}

fn scoped_args(context: Option<&Term>, triples: &[Triple]) -> Result<Vec<Value>> {
    let mut args = Vec::with_capacity(triples.len() + 1);
    args.push(codec::serialize_context(&context.cloned())?);
    for t in triples {
        args.push(codec::serialize_triple(t)?);
    }
    Ok(args)
}

fn expect_bool(value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| bad_shape("expected a boolean"))
}

fn expect_int(value: &Value) -> Result<i64> {
    value.as_int().ok_or_else(|| bad_shape("expected an integer"))
}

fn term_list(value: &Value) -> Result<Vec<Term>> {
    value
        .as_list()
        .ok_or_else(|| bad_shape("expected a list of terms"))?
        .iter()
        .map(codec::unserialize)
        .collect()
}

fn bad_shape(msg: &str) -> Error {
    Error::InvalidTermEncoding(msg.to_string())
}
