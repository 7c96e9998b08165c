//! Quote relay: the zero-queue path from pump callbacks to quote sinks.
//!
//! Quotes are latency-sensitive and loss-tolerant, so they bypass the trade
//! queue entirely: each update is forwarded on the thread the venue
//! delivered it on. No dedup, no ordering across pumps, no buffering; a
//! missed quote is superseded by the next one.

use std::sync::Arc;

use mt4_core::QuoteUpdate;
use tracing::warn;

use crate::sink::QuoteSink;

/// Stateless fan-out to the registered quote sinks.
///
/// Shared by every pump in the pool; safe to call from any number of
/// delivery threads at once.
pub struct QuoteRelay {
    sinks: Vec<Arc<dyn QuoteSink>>,
}

impl QuoteRelay {
    pub fn new(sinks: Vec<Arc<dyn QuoteSink>>) -> Self {
        Self { sinks }
    }

    /// Forward one quote to every sink on the calling thread.
    ///
    /// A failing sink is logged and skipped; the remaining sinks still see
    /// the quote. The best-effort lane never aborts as a whole.
    pub fn relay(&self, quote: &QuoteUpdate) {
        for sink in &self.sinks {
            if let Err(e) = sink.on_new_quote(quote) {
                warn!("[quote-relay] sink rejected {} update: {e}", quote.symbol);
            }
        }
    }

    /// Number of registered quote sinks.
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}
