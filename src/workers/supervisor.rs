//! Worker lifecycle supervision.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::{Worker, WorkerDescriptor};

/// How long a stopped worker gets to wind down before it is aborted. Kept
/// below the settle interval so teardown is done before restarts begin.
const STOP_GRACE: Duration = Duration::from_millis(200);

struct RunningWorker {
    name: &'static str,
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Starts and stops named workers, idempotently.
///
/// Workers are registered once at startup; `apply_desired_state` then maps
/// each saved configuration onto the running set. All entry points are
/// non-blocking from the caller's perspective.
pub struct Supervisor {
    registry: DashMap<&'static str, Arc<dyn Worker>>,
    running: DashMap<&'static str, RunningWorker>,
    settle: Duration,
}

impl Supervisor {
    pub fn new(settle: Duration) -> Self {
        Self {
            registry: DashMap::new(),
            running: DashMap::new(),
            settle,
        }
    }

    /// Inject a named worker implementation.
    pub fn register(&self, worker: Arc<dyn Worker>) {
        let name = worker.name();
        if self.registry.insert(name, worker).is_some() {
            warn!(worker = name, "worker re-registered, previous implementation replaced");
        }
    }

    /// Start a worker by name. Already running or unknown names are no-ops.
    pub fn start(&self, name: &str) {
        let Some(worker) = self.registry.get(name).map(|w| Arc::clone(&w)) else {
            warn!(worker = name, "start skipped, no such worker registered");
            return;
        };

        let static_name = worker.name();
        // Entry holds the shard lock across the check and the insert, so two
        // concurrent restarts cannot spawn the same worker twice.
        match self.running.entry(static_name) {
            Entry::Occupied(_) => {
                debug!(worker = static_name, "start skipped, already running");
            }
            Entry::Vacant(slot) => {
                let (stop_tx, stop_rx) = watch::channel(false);
                let task = tokio::spawn(async move {
                    worker.run(stop_rx).await;
                });
                slot.insert(RunningWorker {
                    name: static_name,
                    stop: stop_tx,
                    task,
                });
                info!(worker = static_name, "worker started");
            }
        }
    }

    /// Stop a worker by name. Not running is a no-op, not an error.
    pub fn stop(&self, name: &str) {
        let Some((_, mut running)) = self.running.remove(name) else {
            debug!(worker = name, "stop skipped, not running");
            return;
        };
        let _ = running.stop.send(true);

        // Reap off to the side so stop never blocks its caller.
        tokio::spawn(async move {
            match timeout(STOP_GRACE, &mut running.task).await {
                Ok(Ok(())) => info!(worker = running.name, "worker stopped"),
                Ok(Err(e)) => warn!(worker = running.name, error = %e, "worker ended abnormally"),
                Err(_) => {
                    running.task.abort();
                    debug!(worker = running.name, "worker aborted after grace period");
                }
            }
        });
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name)
    }

    /// Restart the managed workers to match `desired`, off the caller's path.
    ///
    /// Fire-and-forget: no cancellation, no timeout; failures are logged.
    /// The caller (an HTTP handler) gets its response without waiting.
    pub fn apply_desired_state(self: Arc<Self>, desired: Vec<WorkerDescriptor>) {
        tokio::spawn(async move {
            self.restart(desired).await;
        });
    }

    async fn restart(&self, desired: Vec<WorkerDescriptor>) {
        for descriptor in &desired {
            self.stop(descriptor.name);
        }

        tokio::time::sleep(self.settle).await;

        for descriptor in &desired {
            if descriptor.desired_running {
                self.start(descriptor.name);
            }
        }

        info!(
            running = ?desired
                .iter()
                .filter(|d| d.desired_running)
                .map(|d| d.name)
                .collect::<Vec<_>>(),
            "worker set applied"
        );
    }
}
