//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: OinkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{LogSink, OinkConfig};

/// A semantic problem with an otherwise well-formed config.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("log.file must not be empty when log.sink is \"file\"")]
    EmptyLogFile,

    #[error("log.program must not be empty")]
    EmptyProgram,

    #[error("listener.bind_address {0:?} is not a socket address")]
    InvalidBindAddress(String),

    #[error("middleware.page_size must be greater than zero")]
    ZeroPageSize,
}

pub fn validate_config(config: &OinkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.log.sink == LogSink::File && config.log.file.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }
    if config.log.program.trim().is_empty() {
        errors.push(ValidationError::EmptyProgram);
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }
    if config.middleware.page_size == 0 {
        errors.push(ValidationError::ZeroPageSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
