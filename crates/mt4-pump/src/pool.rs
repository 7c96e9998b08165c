//! Pump pool: owns the supervisors, the shared trade queue, and the worker.
//!
//! `start` spawns `pump_count` supervisor tasks and exactly one ingestion
//! worker thread; `stop` flips the shared shutdown flag, grants in-flight
//! cycles a grace period, force-releases any straggler, then waits for the
//! worker to drain the queue. Redundancy is an ingestion concern only: any
//! number of pumps feed the same queue and the same single consumer.

use std::sync::Arc;

use anyhow::{Result, bail};
use mt4_core::account_filter::AccountFilter;
use mt4_core::config::PumpSettings;
use mt4_core::error::Mt4Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::relay::QuoteRelay;
use crate::sink::{QuoteSink, TradeSink};
use crate::supervisor::{PumpSupervisor, PumpTimings};
use crate::terminal::TerminalConnector;
use crate::worker::{self, IngestionContext};

/// The whole pipeline: supervisors, fan-in queue, worker, quote relay.
pub struct PumpPool {
    settings: PumpSettings,
    filter: Arc<AccountFilter>,
    connector: Arc<dyn TerminalConnector>,
    trade_sinks: Vec<Arc<dyn TradeSink>>,
    quote_sinks: Vec<Arc<dyn QuoteSink>>,
    shutdown_tx: Option<watch::Sender<bool>>,
    supervisors: Vec<JoinHandle<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PumpPool {
    /// Validate the settings and build an idle pool.
    ///
    /// Both failure modes are fatal before anything spins up: a
    /// non-positive `pump_count` and a malformed account-range spec.
    pub fn new(
        settings: PumpSettings,
        connector: Arc<dyn TerminalConnector>,
    ) -> Result<Self, Mt4Error> {
        settings.validate()?;
        let filter = Arc::new(AccountFilter::parse(&settings.pump_allow_mt4_account)?);
        Ok(Self {
            settings,
            filter,
            connector,
            trade_sinks: Vec::new(),
            quote_sinks: Vec::new(),
            shutdown_tx: None,
            supervisors: Vec::new(),
            worker: None,
        })
    }

    /// Register a downstream trade sink. Must precede `start`.
    pub fn add_trade_sink(&mut self, sink: Arc<dyn TradeSink>) {
        self.trade_sinks.push(sink);
    }

    /// Register a downstream quote sink. Must precede `start`.
    pub fn add_quote_sink(&mut self, sink: Arc<dyn QuoteSink>) {
        self.quote_sinks.push(sink);
    }

    /// Spawn the ingestion worker and all pump supervisors.
    ///
    /// Every supervisor runs its first cycle immediately rather than
    /// waiting out the first tick, so a healthy venue is pumping well
    /// before `tick_interval` elapses.
    pub async fn start(&mut self) -> Result<()> {
        if self.shutdown_tx.is_some() {
            bail!("pump pool already started");
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (trade_tx, trade_rx) = crossbeam_channel::bounded(self.settings.queue_capacity);

        // Exactly one consumer thread for the whole pool, whatever
        // pump_count is.
        let ctx = IngestionContext {
            filter: self.filter.clone(),
            sinks: self.trade_sinks.clone(),
            cpu_core: self.settings.cpu_affinity_worker,
        };
        self.worker = Some(tokio::task::spawn_blocking(move || {
            worker::run_ingestion_loop(ctx, trade_rx)
        }));

        let relay = Arc::new(QuoteRelay::new(self.quote_sinks.clone()));
        let timings = PumpTimings::from(&self.settings);

        for slot in 0..self.settings.pump_count {
            let supervisor = PumpSupervisor::new(
                slot,
                self.connector.clone(),
                trade_tx.clone(),
                relay.clone(),
                timings,
                shutdown_rx.clone(),
            );
            self.supervisors.push(tokio::spawn(supervisor.run()));
        }
        // The supervisors hold the only senders now; the queue disconnects,
        // and the worker drains out, exactly when the last of them is gone.
        drop(trade_tx);

        self.shutdown_tx = Some(shutdown_tx);
        info!(
            "[pool] started {} pump(s) on terminal '{}', {} trade / {} quote sink(s)",
            self.settings.pump_count,
            self.connector.name(),
            self.trade_sinks.len(),
            self.quote_sinks.len()
        );
        Ok(())
    }

    /// Stop the pool: signal shutdown, grant the grace period, force-release
    /// stragglers, then wait for the worker to drain the queue.
    ///
    /// Idempotent. Returning is the completion signal: once `stop` is back,
    /// every enqueued trade has been dispatched and every session released.
    pub async fn stop(&mut self) {
        let Some(shutdown_tx) = self.shutdown_tx.take() else {
            return; // never started, or already stopped
        };
        let _ = shutdown_tx.send(true);

        // Let in-flight cycles observe the flag and dispose their sessions.
        tokio::time::sleep(self.settings.stop_grace()).await;

        for handle in self.supervisors.drain(..) {
            if !handle.is_finished() {
                warn!("[pool] supervisor still mid-cycle after grace, forcing teardown");
                handle.abort();
            }
            let _ = handle.await;
        }

        if let Some(worker) = self.worker.take() {
            let _ = worker.await;
        }
        info!("[pool] stopped");
    }
}
