//! Async client for the database worker process.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::error::{WorkerError, WorkerResult};
use super::protocol::{methods, QueryParams, QueryResult, QueryTarget, Request, Response};
use crate::config::WorkerSettings;

/// Requests waiting for their response, keyed by request id.
#[derive(Default)]
struct Pending {
    waiters: Mutex<HashMap<String, oneshot::Sender<Response>>>,
}

impl Pending {
    async fn register(&self, id: &str) -> oneshot::Receiver<Response> {
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().await.insert(id.to_string(), tx);
        rx
    }

    async fn forget(&self, id: &str) {
        self.waiters.lock().await.remove(id);
    }

    async fn resolve(&self, response: Response) {
        match self.waiters.lock().await.remove(&response.id) {
            Some(tx) => {
                let _ = tx.send(response);
            }
            None => debug!(id = %response.id, "response for an abandoned request"),
        }
    }

    async fn fail_all(&self) {
        for (id, tx) in self.waiters.lock().await.drain() {
            let _ = tx.send(Response::exited(id));
        }
    }
}

/// Handle on a running worker.
///
/// Requests go to the worker's stdin as NDJSON; a background task reads
/// stdout and routes each response to its caller by id. The child is killed
/// when the client is dropped.
pub struct WorkerClient {
    stdin: Mutex<BufWriter<ChildStdin>>,
    pending: Arc<Pending>,
    reader: JoinHandle<()>,
    _child: Child,
    timeout: Duration,
}

impl WorkerClient {
    /// Start the worker named by `settings`, passing its pool arguments.
    pub async fn spawn(settings: &WorkerSettings) -> WorkerResult<Self> {
        let path = settings.worker_path().ok_or(WorkerError::NotFound)?;
        Self::spawn_command(
            &path,
            &settings.pool.to_worker_args(),
            Duration::from_secs(settings.timeout_secs),
        )
        .await
    }

    pub async fn spawn_command(
        path: &Path,
        args: &[String],
        timeout: Duration,
    ) -> WorkerResult<Self> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::Spawn)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(WorkerError::Spawn(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "worker stdio was not captured",
            )));
        };
        debug!(path = %path.display(), "database worker started");

        let pending = Arc::new(Pending::default());
        let reader = tokio::spawn(read_responses(stdout, Arc::clone(&pending)));

        Ok(Self {
            stdin: Mutex::new(BufWriter::new(stdin)),
            pending,
            reader,
            _child: child,
            timeout,
        })
    }

    /// Run one read-only query against `target`.
    pub async fn execute_query(&self, target: &QueryTarget, sql: &str) -> WorkerResult<QueryResult> {
        let result = self
            .call(methods::EXECUTE_QUERY, QueryParams { target, sql })
            .await?;
        Ok(serde_json::from_value(result)?)
    }

    async fn call<P: Serialize>(&self, method: &'static str, params: P) -> WorkerResult<Value> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut line = serde_json::to_string(&Request {
            id: id.clone(),
            method,
            params,
        })?;
        line.push('\n');

        let rx = self.pending.register(&id).await;
        if let Err(e) = self.send(&line).await {
            self.pending.forget(&id).await;
            return Err(e);
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => return Err(WorkerError::Exited),
            Err(_) => {
                self.pending.forget(&id).await;
                return Err(WorkerError::Timeout(self.timeout));
            }
        };

        response.into_outcome().map_err(WorkerError::from)
    }

    async fn send(&self, line: &str) -> WorkerResult<()> {
        let mut stdin = self.stdin.lock().await;
        stdin
            .write_all(line.as_bytes())
            .await
            .map_err(WorkerError::Send)?;
        stdin.flush().await.map_err(WorkerError::Send)
    }
}

impl Drop for WorkerClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_responses(stdout: ChildStdout, pending: Arc<Pending>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match serde_json::from_str::<Response>(&line) {
                Ok(response) => pending.resolve(response).await,
                Err(e) => warn!(error = %e, "worker: unreadable response line"),
            },
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "worker: read error");
                break;
            }
        }
    }
    pending.fail_all().await;
}
