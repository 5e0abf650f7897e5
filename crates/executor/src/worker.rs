//! Single-writer request queue and worker loop.
//!
//! Submitters append to a FIFO under the dataset mutex and block on a
//! per-request reply slot. The one worker thread drains the queue in
//! order, running a maintenance tick before each dispatch, so callers
//! get the illusion of sequential execution with concurrent submission.
//!
//! Idle behaviour: after 100 ms of consecutive idleness the worker
//! starts sleeping between polls, each idle cycle lengthening the sleep
//! by ~3.3 µs up to a 1 s ceiling (saturation after roughly five quiet
//! minutes). Any executed work resets the back-off — except
//! `INFO_DATASET_MEMORY`, which is passive.
//!
//! SHUTDOWN is intercepted here: the worker persists the dataset, frees
//! the tables, acknowledges, answers everything still queued with
//! "database is closed", and exits.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use coral_core::{CommandError, Reply};
use coral_engine::Dataset;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::executor::execute;
use crate::request::{Action, Request};

/// Idle time before the back-off sleep kicks in.
const IDLE_GRACE: Duration = Duration::from_millis(100);
/// Back-off growth per idle cycle: 1 s spread over five minutes of
/// 1 kHz cycles.
const BACKOFF_STEP: Duration = Duration::from_nanos(1_000_000_000 / (5 * 60 * 1000));
/// Back-off ceiling.
const BACKOFF_MAX: Duration = Duration::from_secs(1);
/// Poll pause inside the idle grace window.
const IDLE_POLL: Duration = Duration::from_millis(1);

/// One-shot reply hand-off from the worker to a blocked submitter.
#[derive(Default)]
pub(crate) struct ReplySlot {
    cell: Mutex<Option<Reply>>,
    ready: Condvar,
}

impl ReplySlot {
    pub(crate) fn deliver(&self, reply: Reply) {
        let mut cell = self.cell.lock();
        *cell = Some(reply);
        self.ready.notify_one();
    }

    pub(crate) fn wait(&self) -> Reply {
        let mut cell = self.cell.lock();
        loop {
            if let Some(reply) = cell.take() {
                return reply;
            }
            self.ready.wait(&mut cell);
        }
    }
}

pub(crate) struct QueueEntry {
    pub(crate) request: Request,
    pub(crate) slot: Arc<ReplySlot>,
}

/// Everything the dataset mutex protects: the FIFO, the dataset itself,
/// and the closed flag that gates new submissions.
pub(crate) struct State {
    pub(crate) queue: VecDeque<QueueEntry>,
    pub(crate) dataset: Dataset,
    pub(crate) closed: bool,
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<State>,
    /// Mirror of `State::closed` for lock-free `is_running` checks; the
    /// field under the mutex is authoritative.
    pub(crate) closed: AtomicBool,
}

impl Shared {
    pub(crate) fn new(dataset: Dataset) -> Self {
        Shared {
            state: Mutex::new(State {
                queue: VecDeque::new(),
                dataset,
                closed: false,
            }),
            closed: AtomicBool::new(false),
        }
    }
}

/// The worker loop. Runs until SHUTDOWN is processed.
pub(crate) fn run(shared: Arc<Shared>) {
    debug!("worker started");
    let mut idle_since: Option<Instant> = None;
    let mut backoff = Duration::ZERO;

    loop {
        let Some(mut state) = shared.state.try_lock() else {
            std::thread::yield_now();
            continue;
        };

        if state.queue.is_empty() {
            state.dataset.maintenance();
            drop(state);

            let now = Instant::now();
            let since = *idle_since.get_or_insert(now);
            if now.duration_since(since) >= IDLE_GRACE {
                backoff = (backoff + BACKOFF_STEP).min(BACKOFF_MAX);
                std::thread::sleep(backoff);
            } else {
                std::thread::sleep(IDLE_POLL);
            }
            continue;
        }

        let mut active = false;
        while let Some(entry) = state.queue.pop_front() {
            state.dataset.maintenance();

            if entry.request.action == Action::Shutdown {
                if let Err(err) = state.dataset.save() {
                    warn!(error = %err, "snapshot save failed during shutdown");
                }
                state.dataset.flushall();
                state.closed = true;
                shared.closed.store(true, Ordering::Release);
                entry.slot.deliver(Reply::Bool(true));
                while let Some(stale) = state.queue.pop_front() {
                    stale.slot.deliver(CommandError::DatabaseClosed.into_reply());
                }
                debug!("worker stopped");
                return;
            }

            if entry.request.action != Action::InfoDatasetMemory {
                active = true;
            }
            let reply = execute(&mut state.dataset, &entry.request);
            entry.slot.deliver(reply);
        }
        drop(state);

        if active {
            idle_since = None;
            backoff = Duration::ZERO;
        }
    }
}
