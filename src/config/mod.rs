//! Daemon configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared by value to the subsystems that need it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the web UI reconfigures the *relay*,
//!   not the daemon itself
//! - All fields have defaults to allow running with no config file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::RelayConfig;
pub use schema::ServerConfig;
pub use schema::StorageConfig;
pub use schema::WorkersConfig;
