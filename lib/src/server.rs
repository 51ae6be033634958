//! BERT-RPC server shell binding the `rdf` operations to a TCP socket.
//!
//! Each connection is served on its own thread. A connection carries a
//! sequence of independent BERP frames; every frame holds one
//! `{call, rdf, Fun, Args}` or `{cast, rdf, Fun, Args}` tuple and
//! receives exactly one `{reply, Result}`, `{noreply}`, or
//! `{error, {Type, Code, Class, Detail, Backtrace}}` frame back. No
//! state survives between frames.

use std::io::ErrorKind;
use std::net::{TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::thread;

use bert_term::{read_frame, write_frame, Value};
use log::{debug, info, warn};

use crate::errors::{Error, Result};
use crate::protocol::{self, MODULE};
use crate::store::GraphStore;

/// Port used when none is specified.
pub const DEFAULT_PORT: u16 = 9999;

/// A BERT-RPC server over a [`GraphStore`].
pub struct Server {
    store: Arc<dyn GraphStore>,
}

impl Server {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Server { store }
    }

    /// Bind `addr` and serve until the listener fails.
    pub fn listen<A: ToSocketAddrs>(&self, addr: A) -> Result<()> {
        let listener = TcpListener::bind(addr)?;
        self.run(listener)
    }

    /// Serve connections accepted from an already-bound listener.
    pub fn run(&self, listener: TcpListener) -> Result<()> {
        if let Ok(addr) = listener.local_addr() {
            info!("listening on {}", addr);
        }
        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let store = Arc::clone(&self.store);
                    thread::spawn(move || serve_connection(store, stream));
                }
                Err(e) => warn!("accept failed: {}", e),
            }
        }
        Ok(())
    }
}

fn serve_connection(store: Arc<dyn GraphStore>, mut stream: TcpStream) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    debug!("{} connected", peer);
    loop {
        let request = match read_frame(&mut stream) {
            Ok(bytes) => bytes,
            Err(bert_term::TermError::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => {
                warn!("{}: dropping connection: {}", peer, e);
                break;
            }
        };
        let response = handle_request(store.as_ref(), &request);
        if let Err(e) = write_frame(&mut stream, &response) {
            warn!("{}: write failed: {}", peer, e);
            break;
        }
    }
    debug!("{} disconnected", peer);
}

/// Process one request frame into one response frame. Never fails:
/// every failure mode becomes an error response.
pub fn handle_request(store: &dyn GraphStore, request: &[u8]) -> Vec<u8> {
    let response = match bert_term::decode(request) {
        Ok(term) => respond(store, &term),
        Err(e) => error_response("protocol", 2, "TermError", &e.to_string()),
    };
    // Encoding only fails on oversized atoms or collections, which the
    // response shapes above never contain.
    bert_term::encode(&response).unwrap_or_default()
}

fn respond(store: &dyn GraphStore, request: &Value) -> Value {
    let (kind, module, function, args) = match request_parts(request) {
        Some(parts) => parts,
        None => {
            return error_response(
                "protocol",
                0,
                "BadRequest",
                "expected {call|cast, Module, Function, Args}",
            )
        }
    };
    if module != MODULE {
        return error_response(
            "server",
            1,
            "NoSuchModule",
            &format!("no such module '{}'", module),
        );
    }
    debug!("{} {}:{}/{}", kind, module, function, args.len());
    match protocol::dispatch(store, function, args) {
        Ok(_) if kind == "cast" => Value::Tuple(vec![Value::atom("noreply")]),
        Ok(result) => Value::Tuple(vec![Value::atom("reply"), result]),
        Err(e) => dispatch_error(e),
    }
}

fn request_parts(request: &Value) -> Option<(&str, &str, &str, &[Value])> {
    let fields = request.as_tuple()?;
    if fields.len() != 4 {
        return None;
    }
    let kind = fields[0].as_atom()?;
    if kind != "call" && kind != "cast" {
        return None;
    }
    Some((
        kind,
        fields[1].as_atom()?,
        fields[2].as_atom()?,
        fields[3].as_list()?,
    ))
}

fn dispatch_error(e: Error) -> Value {
    match &e {
        Error::UnknownOperation(name) => error_response(
            "server",
            2,
            "NoSuchFunction",
            &format!("no such function '{}'", name),
        ),
        Error::InvalidTermEncoding(_) => {
            error_response("user", 1, "InvalidTermEncoding", &e.to_string())
        }
        Error::UnsupportedScope(_) => {
            error_response("user", 2, "UnsupportedScope", &e.to_string())
        }
        Error::Term(_) => error_response("protocol", 2, "TermError", &e.to_string()),
        _ => error_response("server", 0, "ServerError", &e.to_string()),
    }
}

fn error_response(kind: &str, code: i64, class: &str, detail: &str) -> Value {
    Value::Tuple(vec![
        Value::atom("error"),
        Value::Tuple(vec![
            Value::atom(kind),
            Value::Int(code),
            Value::string(class),
            Value::string(detail),
            Value::List(Vec::new()),
        ]),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn call(function: &str, args: Vec<Value>) -> Vec<u8> {
        bert_term::encode(&Value::Tuple(vec![
            Value::atom("call"),
            Value::atom("rdf"),
            Value::atom(function),
            Value::List(args),
        ]))
        .unwrap()
    }

    fn respond_to(store: &MemoryStore, request: &[u8]) -> Value {
        bert_term::decode(&handle_request(store, request)).unwrap()
    }

    #[test]
    fn call_gets_reply() {
        let store = MemoryStore::new();
        let response = respond_to(&store, &call("empty?", vec![]));
        assert_eq!(
            response,
            Value::Tuple(vec![Value::atom("reply"), Value::Bool(true)])
        );
    }

    #[test]
    fn cast_gets_noreply() {
        let store = MemoryStore::new();
        let request = bert_term::encode(&Value::Tuple(vec![
            Value::atom("cast"),
            Value::atom("rdf"),
            Value::atom("clear"),
            Value::List(vec![]),
        ]))
        .unwrap();
        let response = respond_to(&store, &request);
        assert_eq!(response, Value::Tuple(vec![Value::atom("noreply")]));
    }

    #[test]
    fn unknown_module_is_server_error_1() {
        let store = MemoryStore::new();
        let request = bert_term::encode(&Value::Tuple(vec![
            Value::atom("call"),
            Value::atom("calc"),
            Value::atom("add"),
            Value::List(vec![]),
        ]))
        .unwrap();
        let response = respond_to(&store, &request);
        let fields = response.as_tuple().unwrap();
        assert_eq!(fields[0].as_atom(), Some("error"));
        let detail = fields[1].as_tuple().unwrap();
        assert_eq!(detail[0].as_atom(), Some("server"));
        assert_eq!(detail[1].as_int(), Some(1));
    }

    #[test]
    fn unknown_function_is_server_error_2() {
        let store = MemoryStore::new();
        let response = respond_to(&store, &call("frobnicate", vec![]));
        let fields = response.as_tuple().unwrap();
        assert_eq!(fields[0].as_atom(), Some("error"));
        let detail = fields[1].as_tuple().unwrap();
        assert_eq!(detail[0].as_atom(), Some("server"));
        assert_eq!(detail[1].as_int(), Some(2));
    }

    #[test]
    fn undecodable_frame_is_protocol_error() {
        let store = MemoryStore::new();
        let response = bert_term::decode(&handle_request(&store, b"not bert")).unwrap();
        let fields = response.as_tuple().unwrap();
        assert_eq!(fields[0].as_atom(), Some("error"));
        let detail = fields[1].as_tuple().unwrap();
        assert_eq!(detail[0].as_atom(), Some("protocol"));
    }

    #[test]
    fn scope_violation_is_user_error() {
        let store = MemoryStore::new();
        let graph = Value::Tuple(vec![Value::atom("<"), Value::string("http://ex/g")]);
        let response = respond_to(&store, &call("count", vec![graph]));
        let fields = response.as_tuple().unwrap();
        assert_eq!(fields[0].as_atom(), Some("error"));
        let detail = fields[1].as_tuple().unwrap();
        assert_eq!(detail[0].as_atom(), Some("user"));
        assert_eq!(detail[1].as_int(), Some(2));
    }
}
