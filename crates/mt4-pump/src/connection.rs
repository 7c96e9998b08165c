//! Pump connection: the resource wrapper around one terminal session.
//!
//! No retry or scheduling policy lives here; the supervisor decides when to
//! connect, replace, and dispose. Disposal detaches both notification
//! handlers before releasing the session and is idempotent, so the
//! double-dispose that happens when a supervisor tears down an
//! already-replaced connection is harmless.

use tracing::debug;

use crate::terminal::{QuoteCallback, TerminalClient, TradeCallback};

/// One supervised session slot.
///
/// Replaced wholesale on every supervision cycle, never reconnected in
/// place after a successful swap.
pub struct PumpConnection {
    id: usize,
    handle: Option<Box<dyn TerminalClient>>,
}

impl PumpConnection {
    /// Wrap a freshly opened terminal session.
    pub fn new(id: usize, client: Box<dyn TerminalClient>) -> Self {
        Self {
            id,
            handle: Some(client),
        }
    }

    /// Connection id, unique within one supervisor.
    pub fn id(&self) -> usize {
        self.id
    }

    /// (Re-)attempt the venue connection. No-op once disposed.
    pub fn connect(&mut self) -> anyhow::Result<()> {
        match self.handle.as_mut() {
            Some(client) => client.connect(),
            None => Ok(()),
        }
    }

    /// Whether the session is live. Always `false` once disposed.
    pub fn is_alive(&self) -> bool {
        self.handle.as_ref().is_some_and(|client| client.is_alive())
    }

    /// Attach both notification handlers to the session.
    pub fn subscribe(&mut self, on_trade: TradeCallback, on_quote: QuoteCallback) {
        if let Some(client) = self.handle.as_mut() {
            client.on_trade(on_trade);
            client.on_quote(on_quote);
        }
    }

    /// Detach handlers and release the session. Safe to call twice.
    pub fn dispose(&mut self) {
        if let Some(mut client) = self.handle.take() {
            client.clear_handlers();
            client.dispose();
            debug!("[conn-{}] session released", self.id);
        }
    }
}

impl Drop for PumpConnection {
    fn drop(&mut self) {
        // Covers the forced-teardown path where a supervisor task is aborted
        // mid-cycle and never reaches its own dispose call.
        self.dispose();
    }
}
