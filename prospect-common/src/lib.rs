//! Common types and utilities shared across Prospect crates.
//!
//! This crate defines the shared error type and the centralised tracing
//! initialisation used by every binary and integration test in the
//! workspace. It is intentionally lightweight so that all crates can depend
//! on it without pulling in heavy transitive costs.
//!
//! # Overview
//!
//! - [`observability`]: rolling-file `tracing` setup
//! - [`ProspectError`] and [`Result`]: shared error handling

pub mod observability;

/// Error types used across the Prospect system.
#[derive(thiserror::Error, Debug)]
pub enum ProspectError {
    /// The row store could not be read or written.
    #[error("Sheet error: {0}")]
    Sheet(String),

    /// The language-model collaborator reported a failure.
    #[error("LLM error: {0}")]
    Llm(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ProspectError`].
pub type Result<T> = std::result::Result<T, ProspectError>;
