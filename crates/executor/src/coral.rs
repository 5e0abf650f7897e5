//! The `Coral` facade: lifecycle, submission, and the public command API.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::JoinHandle;

use coral_core::{CommandError, Reply};
use coral_engine::{Dataset, EngineConfig, EngineError};
use parking_lot::Mutex;
use tracing::info;

use crate::parse::parse_line;
use crate::request::Request;
use crate::worker::{self, QueueEntry, ReplySlot, Shared};

/// A running engine: one worker thread owning the dataset, any number of
/// submitters.
///
/// # Example
///
/// ```ignore
/// use coral_executor::{Coral, EngineConfig, Reply};
///
/// let db = Coral::start(EngineConfig::new().persistence_path("db.json"))?;
/// assert_eq!(db.command("SET author cch137"), Reply::Bool(true));
/// assert_eq!(db.command("GET author"), Reply::Str("cch137".into()));
/// db.shutdown();
/// ```
pub struct Coral {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Coral {
    /// Load the snapshot, spawn the worker, and hand back a running
    /// engine. A present-but-corrupt snapshot is fatal here.
    pub fn start(config: EngineConfig) -> Result<Coral, EngineError> {
        let dataset = Dataset::open(config)?;
        let shared = Arc::new(Shared::new(dataset));
        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name("coral-worker".to_string())
            .spawn(move || worker::run(worker_shared))
            .expect("failed to spawn worker thread");
        info!("engine started");
        Ok(Coral {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// True until SHUTDOWN has been processed.
    pub fn is_running(&self) -> bool {
        !self.shared.closed.load(Ordering::Acquire)
    }

    /// Parse a command line and execute it synchronously.
    pub fn command(&self, line: &str) -> Reply {
        match parse_line(line) {
            Ok(request) => self.submit(request),
            Err(err) => err.into_reply(),
        }
    }

    /// Enqueue a structured request and block until its reply arrives.
    ///
    /// Requests are executed in FIFO order across all submitters; each
    /// submitter observes its own requests in submission order. There is
    /// no cancellation: every enqueued request is answered.
    pub fn submit(&self, request: Request) -> Reply {
        let slot = Arc::new(ReplySlot::default());
        {
            let mut state = self.shared.state.lock();
            if state.closed {
                return CommandError::DatabaseClosed.into_reply();
            }
            state.queue.push_back(QueueEntry {
                request,
                slot: Arc::clone(&slot),
            });
        }
        slot.wait()
    }

    /// Submit SHUTDOWN and join the worker. Idempotent: on an already
    /// closed engine this returns the "database is closed" error reply.
    pub fn shutdown(&self) -> Reply {
        let reply = self.submit(Request::new(crate::request::Action::Shutdown, Vec::new()));
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        reply
    }
}

impl Drop for Coral {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.shutdown();
        } else if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
    }
}
