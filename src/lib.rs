//! Telegram Relay
//!
//! A message-forwarder daemon configured through a self-hosted web UI.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                TELEGRAM RELAY                │
//!                        │                                              │
//!     Browser            │  ┌─────────┐   ┌──────────┐   ┌───────────┐ │
//!     ───────────────────┼─▶│  http   │──▶│  router  │──▶│ api / web │ │
//!                        │  │ server  │   │ dispatch │   │ handlers  │ │
//!                        │  └─────────┘   └──────────┘   └─────┬─────┘ │
//!                        │                                     │       │
//!                        │                                     ▼       │
//!                        │                             ┌────────────┐  │
//!                        │                             │   store    │  │
//!                        │                             │   (book)   │  │
//!                        │                             └─────┬──────┘  │
//!                        │                                   │ save    │
//!                        │                                   ▼         │
//!                        │  ┌─────────────────────────────────────────┐│
//!                        │  │            worker supervisor            ││
//!                        │  │ ┌───────────────┐  ┌──────────────────┐ ││
//!     Telegram chat ◀────┼──┼─│battery monitor│  │chat-command poll │ ││
//!                        │  │ └───────────────┘  └──────────────────┘ ││
//!                        │  └─────────────────────────────────────────┘│
//!                        │                                             │
//!                        │  ┌────────────────────────────────────────┐ │
//!                        │  │          Cross-Cutting Concerns        │ │
//!                        │  │  ┌────────┐ ┌────────┐ ┌─────────────┐ │ │
//!                        │  │  │ config │ │ system │ │  lifecycle  │ │ │
//!                        │  │  │        │ │ probes │ │ start/stop  │ │ │
//!                        │  │  └────────┘ └────────┘ └─────────────┘ │ │
//!                        │  └────────────────────────────────────────┘ │
//!                        └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod store;
pub mod workers;

// Collaborators
pub mod system;
pub mod telegram;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;

pub use config::RelayConfig;
pub use error::{Error, Result};
pub use http::server::{AppState, ConfigServer, ServerHandle};
pub use lifecycle::Shutdown;
pub use store::book::Book;
pub use store::settings::ForwarderSettings;
pub use workers::supervisor::Supervisor;
