//! # mt4-pump
//!
//! The pump pipeline: supervised redundant sessions to an MT4-style venue
//! terminal, fanned into one deduplicated, account-filtered, ordered trade
//! stream plus a best-effort quote stream.
//!
//! ## Architecture
//!
//! ```text
//!  terminal sessions (pump_count, supervised, replaced per tick)
//!         │ trades                       │ quotes
//!         ▼                              ▼
//!   bounded fan-in queue            QuoteRelay (no queue)
//!         │                              │
//!         ▼                              ▼
//!   TradeIngestionWorker            QuoteSink(s)
//!   (filter + dedup, one consumer)
//!         │
//!         ▼
//!   TradeSink(s)
//! ```
//!
//! The [`pool::PumpPool`] owns the whole pipeline: `pump_count` supervisors,
//! the bounded fan-in queue, exactly one ingestion worker thread, and the
//! quote relay. Trades reach sinks in processed order and at most once per
//! venue timestamp tick; quotes are relayed unqueued on the delivering
//! pump's thread.
//!
//! ## Shared infrastructure
//!
//! - [`terminal`]: the venue-client traits the rest of the crate drives
//! - [`registry`]: config string to connector factory
//! - [`sim`]: scriptable in-process venue for tests and the demo runner

pub mod connection;
pub mod pool;
pub mod registry;
pub mod relay;
pub mod sim;
pub mod sink;
pub mod supervisor;
pub mod terminal;
pub mod worker;

pub use pool::PumpPool;
pub use sink::{QuoteSink, TradeSink};
