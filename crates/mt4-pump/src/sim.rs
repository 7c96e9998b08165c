//! In-process terminal simulator.
//!
//! A scriptable venue standing in for a real terminal: the runner uses it
//! as the default connector and the pipeline tests drive it to reproduce
//! venue behavior (redundant delivery, outages, recovery). One
//! [`SimControl`] handle scripts the venue; every session opened by its
//! [`SimConnector`] shares that state, and a pushed event is delivered to
//! every live, subscribed session, which is exactly how `pump_count`
//! redundant pumps each see the same notification.

use std::sync::{Arc, Mutex};

use mt4_core::error::Mt4Error;
use mt4_core::{QuoteUpdate, TradeRecord, TransactionType};

use crate::sink::{QuoteSink, TradeSink};
use crate::terminal::{QuoteCallback, TerminalClient, TerminalConnector, TradeCallback};

// ---------------------------------------------------------------------------
// Venue state: shared by the connector, its sessions, and the control handle
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SessionSlot {
    connected: bool,
    disposed: bool,
    trade_cb: Option<TradeCallback>,
    quote_cb: Option<QuoteCallback>,
}

#[derive(Default)]
struct VenueState {
    alive: bool,
    sessions: Vec<SessionSlot>,
    opens: u64,
    connects: u64,
    disposes: u64,
}

// ---------------------------------------------------------------------------
// SimControl: scripts the venue from tests and demos
// ---------------------------------------------------------------------------

/// Scripting handle over the simulated venue.
///
/// Cloning is cheap and every clone observes the same state.
#[derive(Clone, Default)]
pub struct SimControl {
    state: Arc<Mutex<VenueState>>,
}

impl SimControl {
    /// Flip venue reachability. New sessions and reconnect attempts follow
    /// the flag; already-connected sessions go dead when it drops.
    pub fn set_alive(&self, alive: bool) {
        self.state.lock().unwrap().alive = alive;
    }

    /// Deliver one trade notification to every live, subscribed session.
    pub fn push_trade(&self, transaction_type: TransactionType, record: TradeRecord) {
        let callbacks: Vec<TradeCallback> = {
            let state = self.state.lock().unwrap();
            state
                .sessions
                .iter()
                .filter(|s| s.connected && !s.disposed)
                .filter_map(|s| s.trade_cb.clone())
                .collect()
        };
        // Invoked outside the lock; callbacks may call back into the venue.
        for cb in callbacks {
            cb(transaction_type, record.clone());
        }
    }

    /// Deliver one quote notification to every live, subscribed session.
    pub fn push_quote(&self, quote: QuoteUpdate) {
        let callbacks: Vec<QuoteCallback> = {
            let state = self.state.lock().unwrap();
            state
                .sessions
                .iter()
                .filter(|s| s.connected && !s.disposed)
                .filter_map(|s| s.quote_cb.clone())
                .collect()
        };
        for cb in callbacks {
            cb(quote.clone());
        }
    }

    /// Sessions opened so far.
    pub fn opens(&self) -> u64 {
        self.state.lock().unwrap().opens
    }

    /// Connect attempts so far, successful or not.
    pub fn connects(&self) -> u64 {
        self.state.lock().unwrap().connects
    }

    /// Dispose calls that actually released a session.
    pub fn disposes(&self) -> u64 {
        self.state.lock().unwrap().disposes
    }

    /// Sessions currently connected, subscribed, and not disposed.
    pub fn live_sessions(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .sessions
            .iter()
            .filter(|s| s.connected && !s.disposed && s.trade_cb.is_some())
            .count()
    }
}

// ---------------------------------------------------------------------------
// SimConnector / SimTerminal: the terminal traits over the shared venue
// ---------------------------------------------------------------------------

/// Connector producing [`SimTerminal`] sessions over one shared venue.
pub struct SimConnector {
    control: SimControl,
}

impl SimConnector {
    /// Create a simulated venue; `alive` is its initial reachability.
    pub fn new(alive: bool) -> Self {
        let control = SimControl::default();
        control.set_alive(alive);
        Self { control }
    }

    /// The scripting handle for this venue.
    pub fn control(&self) -> SimControl {
        self.control.clone()
    }
}

impl TerminalConnector for SimConnector {
    fn name(&self) -> &str {
        "sim"
    }

    fn open(&self) -> Box<dyn TerminalClient> {
        let mut state = self.control.state.lock().unwrap();
        state.opens += 1;
        // Opening initiates the first connection attempt.
        let connected = state.alive;
        state.sessions.push(SessionSlot {
            connected,
            ..Default::default()
        });
        let index = state.sessions.len() - 1;
        drop(state);
        Box::new(SimTerminal {
            state: self.control.state.clone(),
            index,
        })
    }
}

/// One simulated terminal session.
///
/// Holds an index into the venue's session table; slots are never removed,
/// so the index stays valid for the session's lifetime.
pub struct SimTerminal {
    state: Arc<Mutex<VenueState>>,
    index: usize,
}

impl TerminalClient for SimTerminal {
    fn connect(&mut self) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.connects += 1;
        let alive = state.alive;
        state.sessions[self.index].connected = alive;
        if alive {
            Ok(())
        } else {
            Err(Mt4Error::Terminal("simulated venue is unreachable".to_string()).into())
        }
    }

    fn is_alive(&self) -> bool {
        let state = self.state.lock().unwrap();
        let session = &state.sessions[self.index];
        state.alive && session.connected && !session.disposed
    }

    fn on_trade(&mut self, callback: TradeCallback) {
        self.state.lock().unwrap().sessions[self.index].trade_cb = Some(callback);
    }

    fn on_quote(&mut self, callback: QuoteCallback) {
        self.state.lock().unwrap().sessions[self.index].quote_cb = Some(callback);
    }

    fn clear_handlers(&mut self) {
        let mut state = self.state.lock().unwrap();
        let session = &mut state.sessions[self.index];
        session.trade_cb = None;
        session.quote_cb = None;
    }

    fn dispose(&mut self) {
        let mut state = self.state.lock().unwrap();
        let session = &mut state.sessions[self.index];
        if !session.disposed {
            session.disposed = true;
            session.connected = false;
            session.trade_cb = None;
            session.quote_cb = None;
            state.disposes += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingSink: capture-everything sink for assertions
// ---------------------------------------------------------------------------

/// Test sink recording every event it receives.
#[derive(Default)]
pub struct RecordingSink {
    trades: Mutex<Vec<(TransactionType, TradeRecord)>>,
    quotes: Mutex<Vec<QuoteUpdate>>,
}

impl RecordingSink {
    pub fn trades(&self) -> Vec<(TransactionType, TradeRecord)> {
        self.trades.lock().unwrap().clone()
    }

    pub fn quotes(&self) -> Vec<QuoteUpdate> {
        self.quotes.lock().unwrap().clone()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.lock().unwrap().len()
    }

    pub fn quote_count(&self) -> usize {
        self.quotes.lock().unwrap().len()
    }
}

impl TradeSink for RecordingSink {
    fn on_new_trade(
        &self,
        transaction_type: TransactionType,
        record: &TradeRecord,
    ) -> anyhow::Result<()> {
        self.trades
            .lock()
            .unwrap()
            .push((transaction_type, record.clone()));
        Ok(())
    }
}

impl QuoteSink for RecordingSink {
    fn on_new_quote(&self, quote: &QuoteUpdate) -> anyhow::Result<()> {
        self.quotes.lock().unwrap().push(quote.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(order_id: u64) -> TradeRecord {
        TradeRecord {
            order_id,
            login: 100,
            timestamp: 1_700_000_000,
            symbol: "EURUSD".to_string(),
            volume: 0.1,
            open_price: 1.0850,
            close_price: 0.0,
            profit: 0.0,
            comment: String::new(),
        }
    }

    #[test]
    fn push_reaches_only_subscribed_sessions() {
        let connector = SimConnector::new(true);
        let control = connector.control();

        let mut subscribed = connector.open();
        let mut bare = connector.open();
        let _ = bare.connect();

        let sink = Arc::new(RecordingSink::default());
        let capture = sink.clone();
        subscribed.on_trade(Arc::new(move |tt, r| {
            let _ = capture.on_new_trade(tt, &r);
        }));

        control.push_trade(TransactionType::Open, trade(1));
        assert_eq!(sink.trade_count(), 1);
        assert_eq!(control.live_sessions(), 1);
    }

    #[test]
    fn connect_fails_while_venue_is_down() {
        let connector = SimConnector::new(false);
        let control = connector.control();

        let mut session = connector.open();
        assert!(!session.is_alive());
        assert!(session.connect().is_err());

        control.set_alive(true);
        assert!(session.connect().is_ok());
        assert!(session.is_alive());
        assert_eq!(control.connects(), 2);
    }

    #[test]
    fn venue_outage_kills_connected_sessions() {
        let connector = SimConnector::new(true);
        let control = connector.control();

        let session = connector.open();
        assert!(session.is_alive());
        control.set_alive(false);
        assert!(!session.is_alive());
    }

    #[test]
    fn disposed_session_receives_nothing() {
        let connector = SimConnector::new(true);
        let control = connector.control();

        let sink = Arc::new(RecordingSink::default());
        let capture = sink.clone();
        let mut session = connector.open();
        session.on_trade(Arc::new(move |tt, r| {
            let _ = capture.on_new_trade(tt, &r);
        }));
        session.dispose();

        control.push_trade(TransactionType::Open, trade(1));
        assert_eq!(sink.trade_count(), 0);
        assert_eq!(control.disposes(), 1);
    }
}
