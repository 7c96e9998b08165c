//! Pump supervisor: keeps one terminal session alive per pump slot.
//!
//! Each supervisor runs a sequential cycle loop: open a fresh session,
//! establish it with a bounded fast-retry budget, swap it in for the
//! previous one, then sleep until the next tick. Cycles never overlap with
//! themselves, so a slow cycle simply delays the next tick, and the outer
//! loop retries forever without spinning. Losing the venue for one whole
//! cycle is an operator alert, not a process failure.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Sender, TrySendError};
use mt4_core::config::PumpSettings;
use mt4_core::types::trade::TradeEvent;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::connection::PumpConnection;
use crate::relay::QuoteRelay;
use crate::terminal::{QuoteCallback, TerminalConnector, TradeCallback};

/// Aliveness checks attempted per cycle before escalating.
pub const CONNECT_RETRY_ROUNDS: u32 = 5;

/// Timing knobs for one supervisor, extracted from [`PumpSettings`].
#[derive(Debug, Clone, Copy)]
pub struct PumpTimings {
    /// Interval between supervision cycles.
    pub tick_interval: Duration,
    /// Delay between aliveness checks within one cycle.
    pub retry_delay: Duration,
}

impl From<&PumpSettings> for PumpTimings {
    fn from(settings: &PumpSettings) -> Self {
        Self {
            tick_interval: settings.tick_interval(),
            retry_delay: settings.retry_delay(),
        }
    }
}

/// Supervises one pump slot for the pool's lifetime.
pub struct PumpSupervisor {
    slot: u32,
    connector: Arc<dyn TerminalConnector>,
    trade_tx: Sender<TradeEvent>,
    relay: Arc<QuoteRelay>,
    timings: PumpTimings,
    shutdown: watch::Receiver<bool>,
    current: Option<PumpConnection>,
    next_conn_id: usize,
}

impl PumpSupervisor {
    pub fn new(
        slot: u32,
        connector: Arc<dyn TerminalConnector>,
        trade_tx: Sender<TradeEvent>,
        relay: Arc<QuoteRelay>,
        timings: PumpTimings,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            slot,
            connector,
            trade_tx,
            relay,
            timings,
            shutdown,
            current: None,
            next_conn_id: 0,
        }
    }

    /// Drive the supervision loop until shutdown.
    ///
    /// The first cycle runs immediately; afterwards the tick is re-armed
    /// only once a cycle has fully completed. A stop request interrupts the
    /// inter-tick sleep, and a dropped shutdown sender counts as a stop
    /// request.
    pub async fn run(mut self) {
        info!(
            "[pump-{}] supervisor started ({})",
            self.slot,
            self.connector.name()
        );
        loop {
            if *self.shutdown.borrow() {
                break;
            }
            self.run_cycle().await;

            tokio::select! {
                _ = tokio::time::sleep(self.timings.tick_interval) => {}
                // Flag flip or sender drop, either way this is a stop; a
                // closed channel reports ready forever.
                _ = self.shutdown.changed() => break,
            }
        }
        if let Some(mut old) = self.current.take() {
            old.dispose();
        }
        info!("[pump-{}] supervisor stopped", self.slot);
    }

    /// One supervision cycle: open a fresh session, try to establish it, and
    /// either swap it in or escalate and hold no connection at all.
    async fn run_cycle(&mut self) {
        let conn_id = self.next_conn_id;
        self.next_conn_id += 1;
        let mut fresh = PumpConnection::new(conn_id, self.connector.open());

        if Self::establish(self.slot, self.timings, &mut fresh).await {
            // Subscribe before retiring the old session; the brief overlap of
            // two live sessions collapses in the dedup window downstream.
            fresh.subscribe(self.trade_callback(), self.quote_callback());
            if let Some(mut old) = self.current.take() {
                old.dispose();
            }
            debug!("[pump-{}] conn-{} live", self.slot, fresh.id());
            self.current = Some(fresh);
        } else {
            error!(
                "[pump-{}] terminal unreachable after {CONNECT_RETRY_ROUNDS} attempts; \
                 pump is down until the next tick and pushed data in this window is lost",
                self.slot
            );
            // Hold no connection rather than a stale one: both the failed
            // candidate and whatever the previous cycle left are released.
            fresh.dispose();
            if let Some(mut old) = self.current.take() {
                old.dispose();
            }
        }
    }

    /// Bounded fast-retry: up to [`CONNECT_RETRY_ROUNDS`] aliveness checks
    /// with one reconnect attempt between rounds. Success and exhaustion are
    /// explicit, mutually exclusive outcomes.
    ///
    /// Takes `slot` and `timings` by value: the boxed client is `Send` but
    /// not `Sync`, and a `&self` held across the retry sleep would strip
    /// `Send` from the supervisor's future.
    async fn establish(slot: u32, timings: PumpTimings, conn: &mut PumpConnection) -> bool {
        for round in 1..=CONNECT_RETRY_ROUNDS {
            if conn.is_alive() {
                return true;
            }
            let left = CONNECT_RETRY_ROUNDS - round + 1;
            warn!(
                "[pump-{slot}] terminal not alive, {left} attempt(s) left, retrying in {:?}",
                timings.retry_delay
            );
            tokio::time::sleep(timings.retry_delay).await;
            if let Err(e) = conn.connect() {
                warn!("[pump-{slot}] connect attempt failed: {e}");
            }
        }
        false
    }

    fn trade_callback(&self) -> TradeCallback {
        let tx = self.trade_tx.clone();
        let slot = self.slot;
        Arc::new(move |transaction_type, record| {
            match tx.try_send((transaction_type, record)) {
                Ok(()) => {}
                Err(TrySendError::Full((_, lost))) => {
                    warn!(
                        "[pump-{slot}] trade queue full, dropping order {}",
                        lost.order_id
                    );
                }
                Err(TrySendError::Disconnected(_)) => {
                    // Worker already gone; only reachable in the stop race.
                    debug!("[pump-{slot}] trade queue disconnected");
                }
            }
        })
    }

    fn quote_callback(&self) -> QuoteCallback {
        let relay = self.relay.clone();
        Arc::new(move |quote| relay.relay(&quote))
    }
}
