//! rdf-bert: RDF over BERT-RPC.
//!
//! This crate maps a small RDF data model (triples and quads with typed
//! terms) onto the generic BERT tagged-term encoding, and exposes that
//! mapping through a request/response RPC surface: a command protocol
//! over a [`GraphStore`], a TCP server shell, and a client stub.
//!
//! Encode a term:
//!
//! ```
//! use rdf_bert::{codec, Term, Triple};
//!
//! let triple = Triple::new(
//!     Term::blank("foobar"),
//!     Term::uri("http://example/type"),
//!     Term::uri("http://example/Person"),
//! );
//! let term = Term::Triple(Box::new(triple));
//! let bytes = codec::encode(&term).expect("encode ok");
//! assert_eq!(codec::decode(&bytes).expect("decode ok"), term);
//! ```
//!
//! Serve an in-memory store:
//!
//! ```no_run
//! use std::sync::Arc;
//! use rdf_bert::{MemoryStore, Server};
//!
//! let server = Server::new(Arc::new(MemoryStore::new()));
//! server.listen(("0.0.0.0", rdf_bert::DEFAULT_PORT)).expect("serve");
//! ```
//!
//! Query it remotely:
//!
//! ```no_run
//! use rdf_bert::{Client, Pattern};
//!
//! let client = Client::new("localhost:9999");
//! for triple in client.query(None, &Pattern::any()).expect("query ok") {
//!     println!("{}", triple);
//! }
//! ```

pub mod client;
pub mod codec;
pub mod errors;
pub mod protocol;
pub mod server;
pub mod store;
pub mod term;

pub use client::Client;
pub use errors::{Error, Result};
pub use server::{Server, DEFAULT_PORT};
pub use store::{GraphStore, MemoryStore};
pub use term::{Pattern, Quad, Term, Triple};
