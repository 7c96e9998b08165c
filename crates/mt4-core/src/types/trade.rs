//! Trade records as pushed by the terminal.

use serde::{Deserialize, Serialize};

use super::enums::TransactionType;

/// Substring the venue writes into the comment of cancelled trades.
///
/// Matching is case-sensitive; the venue emits the marker in exactly this
/// form.
pub const CANCELLED_MARKER: &str = "cancelled";

/// One trade notification as delivered by the terminal.
///
/// Immutable once received: the pipeline either forwards the record to every
/// trade sink or drops it, never a partial version of it. The price and
/// volume fields are venue payload carried through untouched for downstream
/// consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Venue-assigned order ticket.
    pub order_id: u64,
    /// Account (login) the trade belongs to.
    pub login: u64,
    /// Venue timestamp in epoch seconds. Deduplication operates at this
    /// resolution.
    pub timestamp: i64,
    /// Instrument, e.g. `"EURUSD"`.
    pub symbol: String,
    /// Trade volume in lots.
    pub volume: f64,
    /// Open price.
    pub open_price: f64,
    /// Close price, zero while the position is still open.
    pub close_price: f64,
    /// Realized profit.
    pub profit: f64,
    /// Free-form dealer comment; carries the cancellation marker.
    pub comment: String,
}

impl TradeRecord {
    /// Whether the venue flagged this trade as cancelled via its comment.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.comment.contains(CANCELLED_MARKER)
    }
}

/// A trade notification paired with its transaction kind, the unit carried
/// by the ingestion queue.
pub type TradeEvent = (TransactionType, TradeRecord);
