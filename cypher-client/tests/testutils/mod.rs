//! Scripted in-memory connection for driving the session without a server
//!
//! Statements are matched by exact text against scripted responses; anything
//! unscripted returns no records. Every call the client makes is recorded so
//! tests can assert on ordering.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use cypher_client::{
    ClientState, Connection, Controller, Error, OperatingMode, Record, RecordStream, Result,
    Session, Transaction,
};

/// Calls observed by the fake server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Autocommit(String),
    Begin,
    TxRun(String),
    Commit,
    Rollback,
    Close,
}

/// Scripted reply for one statement
#[derive(Debug, Clone)]
pub enum Response {
    Records(Vec<Record>),
    Syntax(String),
    Constraint(String),
    Database(String),
    Unavailable,
}

impl Response {
    fn into_result(self) -> Result<Vec<Record>> {
        match self {
            Response::Records(records) => Ok(records),
            Response::Syntax(message) => Err(Error::from_server(
                "Neo.ClientError.Statement.SyntaxError",
                message,
            )),
            Response::Constraint(message) => Err(Error::from_server(
                "Neo.ClientError.Schema.ConstraintValidationFailed",
                message,
            )),
            Response::Database(message) => Err(Error::from_server(
                "Neo.DatabaseError.General.UnknownError",
                message,
            )),
            Response::Unavailable => Err(Error::ServiceUnavailable("connection lost".to_string())),
        }
    }
}

#[derive(Default)]
struct ServerState {
    calls: Vec<Call>,
    responses: HashMap<String, Response>,
    fail_commit: bool,
    fail_rollback: bool,
}

/// Shared handle on the fake server; clones observe the same state.
#[derive(Clone, Default)]
pub struct FakeServer {
    state: Rc<RefCell<ServerState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, statement: &str, response: Response) -> &Self {
        self.state
            .borrow_mut()
            .responses
            .insert(statement.to_string(), response);
        self
    }

    pub fn fail_commit(&self) -> &Self {
        self.state.borrow_mut().fail_commit = true;
        self
    }

    pub fn fail_rollback(&self) -> &Self {
        self.state.borrow_mut().fail_rollback = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn connection(&self) -> FakeConnection {
        FakeConnection {
            server: self.clone(),
        }
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn reply(&self, statement: &str) -> Result<Vec<Record>> {
        let response = self.state.borrow().responses.get(statement).cloned();
        response.map_or(Ok(Vec::new()), Response::into_result)
    }
}

pub struct FakeConnection {
    server: FakeServer,
}

impl Connection for FakeConnection {
    type Transaction = FakeTransaction;

    fn run_autocommit(&mut self, statement: &str) -> Result<RecordStream<'_>> {
        self.server.record(Call::Autocommit(statement.to_string()));
        let records = self.server.reply(statement)?;
        Ok(Box::new(records.into_iter().map(Ok::<Record, Error>)))
    }

    fn begin_transaction(&mut self) -> Result<FakeTransaction> {
        self.server.record(Call::Begin);
        Ok(FakeTransaction {
            server: self.server.clone(),
        })
    }

    fn close(self) -> Result<()> {
        self.server.record(Call::Close);
        Ok(())
    }
}

pub struct FakeTransaction {
    server: FakeServer,
}

impl Transaction for FakeTransaction {
    fn run(&mut self, statement: &str) -> Result<RecordStream<'_>> {
        self.server.record(Call::TxRun(statement.to_string()));
        let records = self.server.reply(statement)?;
        Ok(Box::new(records.into_iter().map(Ok::<Record, Error>)))
    }

    fn commit(self) -> Result<()> {
        self.server.record(Call::Commit);
        if self.server.state.borrow().fail_commit {
            return Err(Error::from_server(
                "Neo.TransientError.Transaction.Terminated",
                "transaction terminated",
            ));
        }
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.server.record(Call::Rollback);
        if self.server.state.borrow().fail_rollback {
            return Err(Error::ServiceUnavailable("connection lost".to_string()));
        }
        Ok(())
    }
}

pub type TestController = Controller<FakeConnection, Vec<u8>, Vec<u8>>;

pub fn controller(server: &FakeServer, mode: OperatingMode) -> TestController {
    Controller::new(
        Session::new(server.connection(), mode),
        Vec::new(),
        Vec::new(),
    )
}

pub fn stdout_lines(controller: &TestController) -> Vec<String> {
    String::from_utf8(controller.output().clone())
        .expect("stdout is UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn stderr_lines(controller: &TestController) -> Vec<String> {
    String::from_utf8(controller.diagnostics().clone())
        .expect("stderr is UTF-8")
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn state(controller: &TestController) -> ClientState {
    controller.session().state()
}
