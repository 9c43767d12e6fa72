//! Out-of-process solver backend.
//!
//! # Protocol
//!
//! The program is started once per query.  It receives one JSON document on
//! stdin:
//!
//! ```json
//! {"node_count": 5, "edges": [[0, 1, 400.9], ...], "source": 0, "destination": 4}
//! ```
//!
//! and must write one JSON document to stdout before exiting with status 0:
//!
//! ```json
//! {"predecessors": [-1, 0, 1, -1, 2]}
//! ```
//!
//! # Timeout
//!
//! The child is polled until the deadline; past it the process is killed
//! and reaped, and the query fails with [`RoutingError::Solver`].  Callers
//! serving concurrent requests should run the solve on a blocking-pool
//! thread (see `RouteService::route_async` in `aegis-dispatch`).

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tracing::debug;

use crate::experimental::{SolverBackend, SolverInput};
use crate::{RoutingError, RoutingResult};

/// Hard upper bound on one external solve.
pub const DEFAULT_SOLVER_TIMEOUT: Duration = Duration::from_secs(20);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Deserialize)]
struct SolverOutput {
    predecessors: Vec<i64>,
}

/// Runs an external solver program per query.
#[derive(Clone, Debug)]
pub struct ProcessBackend {
    program: PathBuf,
    args:    Vec<String>,
    timeout: Duration,
}

impl ProcessBackend {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args:    Vec::new(),
            timeout: DEFAULT_SOLVER_TIMEOUT,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn solver_err(what: &str, e: impl std::fmt::Display) -> RoutingError {
    RoutingError::Solver(format!("{what}: {e}"))
}

impl SolverBackend for ProcessBackend {
    fn predecessors(&self, input: &SolverInput) -> RoutingResult<Vec<i64>> {
        let payload = serde_json::to_vec(input).map_err(|e| solver_err("encode input", e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| solver_err("spawn", e))?;

        // Feed stdin and drain stdout on helper threads so neither pipe can
        // fill up and wedge the child while we poll for exit.
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RoutingError::Solver("child stdin unavailable".into()))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| RoutingError::Solver("child stdout unavailable".into()))?;
        let writer = thread::spawn(move || stdin.write_all(&payload));
        let reader = thread::spawn(move || {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).map(|_| buf)
        });

        let started = Instant::now();
        let deadline = started + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RoutingError::Solver(format!(
                        "timed out after {:?}",
                        self.timeout
                    )));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    return Err(solver_err("wait", e));
                }
            }
        };
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, %status, "external solver exited");

        // A child that exits without reading stdin breaks the pipe; that is
        // only an error if it also failed to answer.
        let _ = writer.join();
        let out = reader
            .join()
            .map_err(|_| RoutingError::Solver("stdout reader panicked".into()))?
            .map_err(|e| solver_err("read stdout", e))?;

        if !status.success() {
            return Err(RoutingError::Solver(format!("exited with {status}")));
        }

        let parsed: SolverOutput =
            serde_json::from_slice(&out).map_err(|e| solver_err("malformed output", e))?;
        Ok(parsed.predecessors)
    }
}
