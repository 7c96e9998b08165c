//! Typed error definitions for the pump gateway.
//!
//! Provides [`Mt4Error`] for domain-specific failures that deserve more
//! structure than a plain `anyhow` string. All variants implement
//! `std::error::Error` via `thiserror`, so they flow through `anyhow::Result`
//! at the application boundary without extra glue.

use thiserror::Error;

/// Domain-specific errors for the pump gateway.
#[derive(Debug, Error)]
pub enum Mt4Error {
    /// Configuration parsing or validation failure. Fatal at startup.
    #[error("config error: {0}")]
    Config(String),

    /// Terminal session failure (connect, subscribe, teardown).
    #[error("terminal error: {0}")]
    Terminal(String),
}
