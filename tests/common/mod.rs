//! Shared utilities for integration testing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use tokio::sync::watch;

use telegram_relay::http::server::build_router;
use telegram_relay::workers::{Worker, BATTERY_MONITOR, CHAT_COMMAND};
use telegram_relay::{AppState, Book, Supervisor};

/// A unique scratch directory per test, removable afterwards.
pub fn temp_data_dir() -> PathBuf {
    std::env::temp_dir().join(format!("telegram-relay-test-{}", uuid::Uuid::new_v4()))
}

/// A worker that does nothing but respect its stop signal. Stands in for the
/// real workers so API tests observe supervisor state without touching the
/// network or sysfs.
pub struct IdleWorker {
    pub name: &'static str,
}

#[async_trait]
impl Worker for IdleWorker {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, mut stop: watch::Receiver<bool>) {
        while stop.changed().await.is_ok() {
            if *stop.borrow() {
                break;
            }
        }
    }
}

/// Fresh state over an empty store, with idle stand-ins for both managed
/// workers and a short settle interval.
pub fn test_state() -> (AppState, PathBuf) {
    let dir = temp_data_dir();
    let book = Arc::new(Book::open(&dir, "data").expect("open book"));
    let supervisor = Arc::new(Supervisor::new(Duration::from_millis(20)));
    supervisor.register(Arc::new(IdleWorker { name: BATTERY_MONITOR }));
    supervisor.register(Arc::new(IdleWorker { name: CHAT_COMMAND }));
    (
        AppState {
            book,
            supervisor,
            max_body_bytes: 64 * 1024,
        },
        dir,
    )
}

#[allow(dead_code)]
pub fn test_router(state: AppState) -> Router {
    build_router(state, Duration::from_secs(5))
}
