//! # mt4-core
//!
//! Core crate for the MT4 pump gateway, providing:
//!
//! - **Types** (`types`): transaction enums, trade records, quote updates
//! - **Account filter** (`account_filter`): allowed-login range membership
//! - **Deduplication** (`dedup`): the per-tick trade dedup window
//! - **Configuration** (`config`): JSON config deserialization + validation
//! - **Error types** (`error`): domain-specific `Mt4Error` via thiserror
//! - **Logging** (`logging`): tracing-based structured logging
//! - **CPU affinity** (`cpu_affinity`): thread-to-core pinning

pub mod account_filter;
pub mod config;
pub mod cpu_affinity;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
