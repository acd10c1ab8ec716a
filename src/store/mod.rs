//! Durable key/value persistence.
//!
//! # Data Flow
//! ```text
//! typed value
//!     → settings.rs (field name + per-field default)
//!     → book.rs (JSON-encoded string under a flat key)
//!     → in-memory map (read visibility, immediate)
//!     → flusher thread (temp file + rename, fire-and-forget)
//! ```
//!
//! # Design Decisions
//! - The store is the single source of truth; callers hold no cached copy
//! - Reads never fail: absence and corruption both resolve to the caller's
//!   default
//! - Full-document saves go through one batch so concurrent writers cannot
//!   interleave partial documents

pub mod book;
pub mod settings;

pub use book::Book;
pub use settings::ForwarderSettings;
