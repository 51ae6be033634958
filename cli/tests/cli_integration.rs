use std::net::TcpListener;
use std::process::Command;
use std::sync::Arc;
use std::thread;

use rdf_bert::{MemoryStore, Server};

/// Serve a fresh in-memory store on an ephemeral port, returning its
/// address.
fn start_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr").to_string();
    let server = Server::new(Arc::new(MemoryStore::new()));
    thread::spawn(move || {
        let _ = server.run(listener);
    });
    addr
}

fn run(addr: &str, args: &[&str]) -> String {
    let out = Command::new(env!("CARGO_BIN_EXE_rdf-bert"))
        .arg("--server")
        .arg(addr)
        .args(args)
        .output()
        .expect("spawn rdf-bert");
    assert!(
        out.status.success(),
        "rdf-bert {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).expect("utf8 stdout")
}

#[test]
fn insert_query_count_clear() {
    let addr = start_server();

    assert_eq!(run(&addr, &["count"]).trim(), "0");

    run(
        &addr,
        &[
            "insert",
            "http://example.org/alice",
            "http://xmlns.com/foaf/0.1/name",
            "Alice",
        ],
    );
    assert_eq!(run(&addr, &["count"]).trim(), "1");

    let out = run(&addr, &["query", "-", "-", "-"]);
    assert!(out.contains("http://example.org/alice"), "got: {}", out);
    assert!(out.contains("\"Alice\""), "got: {}", out);

    assert_eq!(
        run(
            &addr,
            &[
                "exist",
                "http://example.org/alice",
                "http://xmlns.com/foaf/0.1/name",
                "Alice",
            ],
        )
        .trim(),
        "true"
    );

    run(&addr, &["clear"]);
    assert_eq!(run(&addr, &["count"]).trim(), "0");
}

#[test]
fn named_graph_scoping() {
    let addr = start_server();
    run(
        &addr,
        &[
            "--graph",
            "http://example.org/g",
            "insert",
            "http://example.org/s",
            "http://example.org/p",
            "o",
        ],
    );
    // Default graph stays empty; the named graph holds the triple.
    assert!(run(&addr, &["query", "-", "-", "-"]).trim().is_empty());
    let scoped = run(
        &addr,
        &["--graph", "http://example.org/g", "query", "-", "-", "-"],
    );
    assert!(scoped.contains("http://example.org/s"), "got: {}", scoped);
    assert_eq!(
        run(&addr, &["contexts"]).trim(),
        "<http://example.org/g>"
    );
}

#[test]
fn version_prints_semver() {
    let addr = start_server();
    let out = run(&addr, &["version"]);
    let parts: Vec<&str> = out.trim().split('.').collect();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|p| p.parse::<u64>().is_ok()));
}
