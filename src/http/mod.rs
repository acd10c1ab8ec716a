//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum setup, dispatch by path)
//!     → request.rs (request ID, trace span)
//!     → api.rs (/api/* handlers) or assets.rs (bundled web UI)
//!     → error.rs converts any handler failure into a JSON error body
//! ```

pub mod api;
pub mod assets;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, ConfigServer, ServerHandle};
