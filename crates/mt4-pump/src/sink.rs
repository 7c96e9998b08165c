//! Downstream sink traits: the gateway's delivery boundary.
//!
//! Sinks register on the pool before `start` and receive events
//! synchronously: trades from the single ingestion worker in processed
//! order, quotes on whichever pump thread delivered them. Implementations
//! that need to do slow work should hand the event off internally rather
//! than block these calls.

use mt4_core::{QuoteUpdate, TradeRecord, TransactionType};

/// Consumer of the deduplicated, account-filtered trade stream.
pub trait TradeSink: Send + Sync {
    /// Handle one accepted trade.
    ///
    /// Returning an error aborts the remaining dispatch for this record;
    /// there is no retry.
    fn on_new_trade(
        &self,
        transaction_type: TransactionType,
        record: &TradeRecord,
    ) -> anyhow::Result<()>;
}

/// Consumer of the best-effort quote stream.
pub trait QuoteSink: Send + Sync {
    /// Handle one quote update, on the delivering pump's thread.
    ///
    /// Errors are logged and the quote is skipped for this sink only.
    fn on_new_quote(&self, quote: &QuoteUpdate) -> anyhow::Result<()>;
}
