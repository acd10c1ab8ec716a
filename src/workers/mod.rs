//! Background workers and their supervisor.
//!
//! # Data Flow
//! ```text
//! POST /api/config (save)
//!     → desired_state(settings)        one descriptor per managed worker
//!     → Supervisor::apply_desired_state (detached task)
//!         stop all managed workers      idempotent
//!         settle pause                  let teardown finish
//!         start flagged workers         no duplicates
//! ```
//!
//! # Design Decisions
//! - Workers are injected as named trait objects; the supervisor never names
//!   a concrete worker type
//! - The configuration server is not a managed worker: it is the caller and
//!   must stay up to report restart progress
//! - Stop/start failures are logged and swallowed; the supervisor stays
//!   usable for the next restart

use async_trait::async_trait;
use tokio::sync::watch;

use crate::store::settings::ForwarderSettings;

pub mod battery;
pub mod chat_command;
pub mod supervisor;

pub use supervisor::Supervisor;

/// Managed worker names.
pub const BATTERY_MONITOR: &str = "battery-monitor";
pub const CHAT_COMMAND: &str = "chat-command";

/// A named long-running background task.
///
/// `run` must return promptly once the stop signal flips to true; the
/// supervisor aborts laggards after a short grace period.
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    async fn run(&self, stop: watch::Receiver<bool>);
}

/// Which worker should be running, derived from the latest saved settings.
/// Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerDescriptor {
    pub name: &'static str,
    pub desired_running: bool,
}

/// Derive the desired worker set from a configuration document.
pub fn desired_state(settings: &ForwarderSettings) -> Vec<WorkerDescriptor> {
    vec![
        WorkerDescriptor {
            name: BATTERY_MONITOR,
            desired_running: settings.battery_monitoring,
        },
        WorkerDescriptor {
            name: CHAT_COMMAND,
            desired_running: settings.chat_command,
        },
    ]
}
