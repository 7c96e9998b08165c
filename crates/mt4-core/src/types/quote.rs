//! Quote updates as pushed by the terminal.

use serde::{Deserialize, Serialize};

/// One bid/ask update for a symbol.
///
/// Ephemeral by design: relayed to quote sinks on the delivering pump's
/// thread and never queued or stored. A missed quote is superseded by the
/// next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// Instrument, e.g. `"EURUSD"`.
    pub symbol: String,
    /// Best bid.
    pub bid: f64,
    /// Best ask.
    pub ask: f64,
    /// Venue timestamp in epoch seconds.
    pub time: i64,
}

impl QuoteUpdate {
    /// Bid/ask spread, in price units.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }
}
