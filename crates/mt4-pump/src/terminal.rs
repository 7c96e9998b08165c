//! The terminal boundary: traits the venue-side client implements.
//!
//! The gateway does not own the venue transport. A [`TerminalConnector`]
//! hands out [`TerminalClient`] sessions; each session pushes trade and
//! quote notifications through registered callbacks on threads the client
//! controls. Connection supervision, retry, and teardown policy live in
//! this crate, never inside the client.

use std::sync::Arc;

use mt4_core::{QuoteUpdate, TradeRecord, TransactionType};

/// Callback invoked for each trade notification.
///
/// The record is handed over by value; the terminal keeps nothing after
/// delivery.
pub type TradeCallback = Arc<dyn Fn(TransactionType, TradeRecord) + Send + Sync>;

/// Callback invoked for each quote notification.
pub type QuoteCallback = Arc<dyn Fn(QuoteUpdate) + Send + Sync>;

/// One session to the venue terminal.
///
/// Opening a session (via [`TerminalConnector::open`]) initiates the first
/// connection attempt; [`connect`](TerminalClient::connect) re-attempts it.
/// The session delivers no notifications until handlers are attached.
pub trait TerminalClient: Send {
    /// (Re-)attempt the connection to the venue.
    fn connect(&mut self) -> anyhow::Result<()>;

    /// Whether the push session is currently live.
    fn is_alive(&self) -> bool;

    /// Attach the trade notification handler.
    fn on_trade(&mut self, callback: TradeCallback);

    /// Attach the quote notification handler.
    fn on_quote(&mut self, callback: QuoteCallback);

    /// Detach both notification handlers.
    fn clear_handlers(&mut self);

    /// Release the underlying session. Safe to call more than once.
    fn dispose(&mut self);
}

/// Factory for terminal sessions, one per supervised pump connection.
pub trait TerminalConnector: Send + Sync {
    /// Connector name for logs and the registry.
    fn name(&self) -> &str;

    /// Open a fresh session. Opening never blocks on the venue; aliveness is
    /// reported by the session itself.
    fn open(&self) -> Box<dyn TerminalClient>;
}
