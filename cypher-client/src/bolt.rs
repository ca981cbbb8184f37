// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Bolt connection provider on top of `neo4rs`
//!
//! The driver is async; each session owns a current-thread Tokio runtime and
//! blocks on every call, so the rest of the client stays sequential.

use std::sync::Arc;

use lazy_static::lazy_static;
use log::{debug, info};
use neo4rs::{query, Graph, Row, RowStream, Txn};
use regex::Regex;
use serde_json::{Map, Value};
use tokio::runtime::{Builder, Runtime};

use crate::config::ConnectionConfig;
use crate::connection::{Connection, Connector, RecordStream, Transaction};
use crate::error::{Error, Result};
use crate::record::Record;

/// Statement used to verify credentials right after connecting; the driver
/// pool otherwise connects lazily.
const VERIFY_STATEMENT: &str = "RETURN 1";

lazy_static! {
    /// Any Neo4j status code, e.g. `Neo.ClientError.Statement.SyntaxError`
    static ref STATUS_CODE: Regex = Regex::new(r"Neo\.[A-Za-z]+\.[A-Za-z]+\.[A-Za-z]+")
        .expect("status code pattern is valid");

    /// `code` and `message` entries of a FAILURE summary as the driver
    /// renders it: `BoltString { value: "message" }: String(BoltString { value: "..." })`
    static ref FAILURE_FIELD: Regex = Regex::new(
        r#"BoltString \{ value: "(code|message)" \}: String\(BoltString \{ value: "((?:[^"\\]|\\.)*)" \}\)"#
    )
    .expect("failure field pattern is valid");
}

/// Connects to a server over Bolt
#[derive(Debug, Default, Clone, Copy)]
pub struct BoltConnector;

impl Connector for BoltConnector {
    type Connection = BoltSession;

    fn connect(&self, config: &ConnectionConfig) -> Result<BoltSession> {
        let runtime = Arc::new(Builder::new_current_thread().enable_all().build()?);
        let uri = config.uri();
        info!("connecting to {} as {}", uri, config.user);

        let graph = runtime
            .block_on(Graph::new(
                uri.as_str(),
                config.user.as_str(),
                config.password.as_str(),
            ))
            .map_err(translate)?;
        runtime
            .block_on(graph.run(query(VERIFY_STATEMENT)))
            .map_err(translate)?;

        debug!("connected to {}", uri);
        Ok(BoltSession { runtime, graph })
    }
}

pub struct BoltSession {
    runtime: Arc<Runtime>,
    graph: Graph,
}

impl Connection for BoltSession {
    type Transaction = BoltTransaction;

    fn run_autocommit(&mut self, statement: &str) -> Result<RecordStream<'_>> {
        let runtime = &self.runtime;
        let mut stream = runtime
            .block_on(self.graph.execute(query(statement)))
            .map_err(translate)?;
        let mut finished = false;
        Ok(Box::new(std::iter::from_fn(move || {
            if finished {
                return None;
            }
            let next = runtime.block_on(stream.next());
            step(&mut finished, next)
        })))
    }

    fn begin_transaction(&mut self) -> Result<BoltTransaction> {
        let txn = self
            .runtime
            .block_on(self.graph.start_txn())
            .map_err(translate)?;
        Ok(BoltTransaction {
            runtime: Arc::clone(&self.runtime),
            txn,
        })
    }

    fn close(self) -> Result<()> {
        // connections go back to the pool and are dropped with the graph
        drop(self.graph);
        Ok(())
    }
}

pub struct BoltTransaction {
    runtime: Arc<Runtime>,
    txn: Txn,
}

impl Transaction for BoltTransaction {
    fn run(&mut self, statement: &str) -> Result<RecordStream<'_>> {
        let stream = self
            .runtime
            .block_on(self.txn.execute(query(statement)))
            .map_err(translate)?;
        Ok(Box::new(TxRows {
            runtime: &self.runtime,
            txn: &mut self.txn,
            stream,
            finished: false,
        }))
    }

    fn commit(self) -> Result<()> {
        self.runtime.block_on(self.txn.commit()).map_err(translate)
    }

    fn rollback(self) -> Result<()> {
        self.runtime.block_on(self.txn.rollback()).map_err(translate)
    }
}

struct TxRows<'a> {
    runtime: &'a Runtime,
    txn: &'a mut Txn,
    stream: RowStream,
    finished: bool,
}

impl Iterator for TxRows<'_> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let next = self.runtime.block_on(self.stream.next(self.txn.handle()));
        step(&mut self.finished, next)
    }
}

fn step(
    finished: &mut bool,
    next: std::result::Result<Option<Row>, neo4rs::Error>,
) -> Option<Result<Record>> {
    match next {
        Ok(Some(row)) => Some(to_record(&row)),
        Ok(None) => {
            *finished = true;
            None
        }
        Err(e) => {
            *finished = true;
            Some(Err(translate(e)))
        }
    }
}

fn to_record(row: &Row) -> Result<Record> {
    row.to::<Map<String, Value>>()
        .map(Record::from_fields)
        .map_err(|e| Error::Decode(e.to_string()))
}

/// Map a driver error onto the client taxonomy.
fn translate(error: neo4rs::Error) -> Error {
    match error {
        neo4rs::Error::AuthenticationError(message) => Error::Authentication(message),
        neo4rs::Error::IOError { .. } | neo4rs::Error::ConnectionError => {
            Error::ServiceUnavailable(error.to_string())
        }
        other => server_error(&other.to_string()),
    }
}

/// Build a server error from the text of a driver error. A FAILURE summary
/// yields its own code and message; otherwise any status code in the text is
/// used and the text is kept whole.
fn server_error(text: &str) -> Error {
    let (code, message) = failure_fields(text);
    match (code, message) {
        (code, Some(message)) => Error::from_server(code.unwrap_or_default(), message),
        (Some(code), None) => Error::from_server(code, text),
        (None, None) => {
            let code = STATUS_CODE.find(text).map_or("", |m| m.as_str());
            Error::from_server(code, text)
        }
    }
}

/// `code` and `message` of a FAILURE summary embedded in `text`
fn failure_fields(text: &str) -> (Option<String>, Option<String>) {
    let mut code = None;
    let mut message = None;
    for captures in FAILURE_FIELD.captures_iter(text) {
        let value = unescape(&captures[2]);
        match &captures[1] {
            "code" => code = Some(value),
            _ => message = Some(value),
        }
    }
    (code, message)
}

/// Undo the `Debug` escaping of a string value.
fn unescape(escaped: &str) -> String {
    let mut out = String::with_capacity(escaped.len());
    let mut chars = escaped.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = chars
                    .by_ref()
                    .skip_while(|&c| c == '{')
                    .take_while(|&c| c != '}')
                    .collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&format!("\\u{{{}}}", hex)),
                }
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
