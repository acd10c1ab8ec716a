//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges and addresses before the config is accepted
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RelayConfig → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::RelayConfig;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("server.bind_address {0:?} is not a valid socket address")]
    BindAddress(String),
    #[error("telegram.api_base {0:?} is not a valid URL")]
    ApiBase(String),
    #[error("storage.book must not be empty")]
    EmptyBookName,
    #[error("workers.low_battery_percent must be between 1 and 100, got {0}")]
    LowBatteryPercent(u8),
}

/// Validate a deserialized configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if Url::parse(&config.telegram.api_base).is_err() {
        errors.push(ValidationError::ApiBase(config.telegram.api_base.clone()));
    }
    if config.storage.book.is_empty() {
        errors.push(ValidationError::EmptyBookName);
    }
    if !(1..=100).contains(&config.workers.low_battery_percent) {
        errors.push(ValidationError::LowBatteryPercent(config.workers.low_battery_percent));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
