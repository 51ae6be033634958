use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;
use rdf_bert::{Client, MemoryStore, Pattern, Server, Term, Triple, DEFAULT_PORT};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "rdf-bert")]
#[command(about = "RDF repository server and client over BERT-RPC")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
    /// Server address for client commands
    #[clap(long, short, default_value = "localhost:9999", global = true)]
    server: String,
    /// Named graph to scope per-triple commands to; default graph if omitted
    #[clap(long, short, global = true)]
    graph: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve an in-memory repository over BERT-RPC.
    Serve {
        /// Address to listen on.
        #[clap(long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on.
        #[clap(long, short, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Print the remote protocol version.
    Version,
    /// Print the number of statements on the server.
    Count,
    /// Print the named-graph contexts in use.
    Contexts,
    /// Print the distinct subjects across the whole store.
    Subjects,
    /// Print the distinct predicates across the whole store.
    Predicates,
    /// Insert one triple.
    Insert {
        subject: String,
        predicate: String,
        object: String,
    },
    /// Delete one triple.
    Delete {
        subject: String,
        predicate: String,
        object: String,
    },
    /// Check whether one triple is present.
    Exist {
        subject: String,
        predicate: String,
        object: String,
    },
    /// Match a pattern; use '-' as a wildcard position.
    Query {
        #[clap(default_value = "-")]
        subject: String,
        #[clap(default_value = "-")]
        predicate: String,
        #[clap(default_value = "-")]
        object: String,
    },
    /// Dump every statement, named graphs included.
    Dump,
    /// Remove every statement from every graph.
    Clear,
}

/// Parse a term from its command-line spelling: `<uri>`, `_:bnode`,
/// `?var`, a bare `http(s)://` URI, or anything else as a plain literal.
fn parse_term(s: &str) -> Term {
    if let Some(inner) = s.strip_prefix('<').and_then(|r| r.strip_suffix('>')) {
        Term::uri(inner)
    } else if let Some(id) = s.strip_prefix("_:") {
        Term::blank(id)
    } else if let Some(name) = s.strip_prefix('?') {
        Term::variable(name)
    } else if s.starts_with("http://") || s.starts_with("https://") {
        Term::uri(s)
    } else {
        Term::literal(s)
    }
}

fn parse_position(s: &str) -> Option<Term> {
    if s == "-" {
        None
    } else {
        Some(parse_term(s))
    }
}

fn parse_graph(graph: &Option<String>) -> Result<Option<Term>> {
    match graph {
        None => Ok(None),
        Some(g) => match parse_term(g) {
            t @ (Term::Uri(_) | Term::BlankNode(_)) => Ok(Some(t)),
            other => Err(anyhow!("--graph must be a URI or blank node, got {}", other)),
        },
    }
}

fn main() -> Result<()> {
    let cmd = Cli::parse();

    let log_level = if cmd.verbose { "info" } else { "warn" };
    let log_level = if cmd.debug { "debug" } else { log_level };
    std::env::set_var("RUST_LOG", log_level);
    env_logger::init();

    if let Commands::Serve { host, port } = &cmd.command {
        info!("serving in-memory repository on {}:{}", host, port);
        let server = Server::new(Arc::new(MemoryStore::new()));
        server.listen((host.as_str(), *port))?;
        return Ok(());
    }

    let client = Client::new(cmd.server.clone());
    let graph = parse_graph(&cmd.graph)?;

    match cmd.command {
        Commands::Serve { .. } => unreachable!("handled above"),
        Commands::Version => {
            let (major, minor, patch) = client.version()?;
            println!("{}.{}.{}", major, minor, patch);
        }
        Commands::Count => println!("{}", client.count()?),
        Commands::Contexts => {
            for c in client.contexts()? {
                println!("{}", c);
            }
        }
        Commands::Subjects => {
            for s in client.subjects()? {
                println!("{}", s);
            }
        }
        Commands::Predicates => {
            for p in client.predicates()? {
                println!("{}", p);
            }
        }
        Commands::Insert {
            subject,
            predicate,
            object,
        } => {
            let triple = Triple::new(
                parse_term(&subject),
                parse_term(&predicate),
                parse_term(&object),
            );
            client.insert(graph.as_ref(), &[triple])?;
        }
        Commands::Delete {
            subject,
            predicate,
            object,
        } => {
            let triple = Triple::new(
                parse_term(&subject),
                parse_term(&predicate),
                parse_term(&object),
            );
            client.delete(graph.as_ref(), &[triple])?;
        }
        Commands::Exist {
            subject,
            predicate,
            object,
        } => {
            let triple = Triple::new(
                parse_term(&subject),
                parse_term(&predicate),
                parse_term(&object),
            );
            let known = client.known(graph.as_ref(), &[triple])?;
            println!("{}", known.first().copied().unwrap_or(false));
        }
        Commands::Query {
            subject,
            predicate,
            object,
        } => {
            let pattern = Pattern {
                subject: parse_position(&subject),
                predicate: parse_position(&predicate),
                object: parse_position(&object),
                context: None,
            };
            for triple in client.query(graph.as_ref(), &pattern)? {
                println!("{}", triple);
            }
        }
        Commands::Dump => {
            for quad in client.statements()? {
                println!("{}", quad);
            }
        }
        Commands::Clear => client.clear()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_spellings_parse() {
        assert_eq!(parse_term("<http://ex/s>"), Term::uri("http://ex/s"));
        assert_eq!(parse_term("http://ex/s"), Term::uri("http://ex/s"));
        assert_eq!(parse_term("_:b0"), Term::blank("b0"));
        assert_eq!(parse_term("?s"), Term::variable("s"));
        assert_eq!(parse_term("hello"), Term::literal("hello"));
        assert_eq!(parse_position("-"), None);
    }

    #[test]
    fn graph_must_be_a_resource() {
        assert!(parse_graph(&Some("plain literal".to_string())).is_err());
        assert_eq!(
            parse_graph(&Some("http://ex/g".to_string())).unwrap(),
            Some(Term::uri("http://ex/g"))
        );
    }
}
