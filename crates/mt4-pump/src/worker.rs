//! Trade ingestion worker: the single consumer of the shared trade queue.
//!
//! Every pump funnels raw trade notifications into one bounded channel; this
//! loop drains it on a dedicated thread, applying the account filter, the
//! cancellation marker, and the dedup window in that order, then dispatching
//! accepted trades to every trade sink. One consumer means sinks observe
//! trades in enqueue order, duplicates from redundant pumps collapse here,
//! and the dedup window needs no locking.
//!
//! Filter order matters: records rejected by the account filter or the
//! cancellation marker never claim a slot in the dedup window, so a later
//! clean record with the same order id still goes through.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use mt4_core::account_filter::AccountFilter;
use mt4_core::cpu_affinity;
use mt4_core::dedup::TradeDedupWindow;
use mt4_core::types::trade::TradeEvent;
use tracing::{debug, error, info};

use crate::sink::TradeSink;

/// Everything the ingestion loop needs, handed over by the pool.
pub struct IngestionContext {
    /// Allowed-login membership filter, shared read-only.
    pub filter: Arc<AccountFilter>,
    /// Registered trade sinks; dispatch order is fixed at pool construction.
    pub sinks: Vec<Arc<dyn TradeSink>>,
    /// Optional CPU core to pin this thread to.
    pub cpu_core: Option<i32>,
}

/// Run the ingestion loop on the calling thread until the queue disconnects.
///
/// Blocks in `recv` between items (signaled wake, no polling). The loop
/// exits once every producer has dropped its sender *and* the queue has
/// been drained, so shutdown ships whatever was already enqueued.
pub fn run_ingestion_loop(ctx: IngestionContext, rx: Receiver<TradeEvent>) {
    cpu_affinity::maybe_bind(ctx.cpu_core);

    let mut window = TradeDedupWindow::new();
    let mut accepted: u64 = 0;
    let mut dropped: u64 = 0;

    info!("[ingest] trade worker started ({} sinks)", ctx.sinks.len());

    while let Ok((transaction_type, record)) = rx.recv() {
        if !ctx.filter.is_allowed(record.login) {
            dropped += 1;
            continue;
        }
        if record.is_cancelled() {
            dropped += 1;
            continue;
        }
        if !window.check_and_insert(record.timestamp, record.order_id) {
            // Redundant delivery of an order already shipped this tick.
            dropped += 1;
            debug!(
                "[ingest] duplicate order {} at {}",
                record.order_id, record.timestamp
            );
            continue;
        }

        accepted += 1;
        for sink in &ctx.sinks {
            if let Err(e) = sink.on_new_trade(transaction_type, &record) {
                error!(
                    "[ingest] sink rejected order {}: {e}; dispatch aborted for this record",
                    record.order_id
                );
                break;
            }
        }
    }

    info!("[ingest] trade worker exited, {accepted} dispatched, {dropped} dropped");
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::bail;
    use mt4_core::{TradeRecord, TransactionType};

    use super::*;

    #[derive(Default)]
    struct Capture {
        orders: Mutex<Vec<u64>>,
    }

    impl Capture {
        fn orders(&self) -> Vec<u64> {
            self.orders.lock().unwrap().clone()
        }
    }

    impl TradeSink for Capture {
        fn on_new_trade(&self, _tt: TransactionType, r: &TradeRecord) -> anyhow::Result<()> {
            self.orders.lock().unwrap().push(r.order_id);
            Ok(())
        }
    }

    struct RejectOrder(u64);

    impl TradeSink for RejectOrder {
        fn on_new_trade(&self, _tt: TransactionType, r: &TradeRecord) -> anyhow::Result<()> {
            if r.order_id == self.0 {
                bail!("order {} refused", r.order_id)
            }
            Ok(())
        }
    }

    fn trade(order_id: u64, login: u64, timestamp: i64, comment: &str) -> TradeEvent {
        (
            TransactionType::Open,
            TradeRecord {
                order_id,
                login,
                timestamp,
                symbol: "EURUSD".to_string(),
                volume: 0.1,
                open_price: 1.0850,
                close_price: 0.0,
                profit: 0.0,
                comment: comment.to_string(),
            },
        )
    }

    /// Feed `items` through a worker with the `100-200` login filter and the
    /// given sinks, then wait for the drain.
    fn run_worker(items: Vec<TradeEvent>, sinks: Vec<Arc<dyn TradeSink>>) {
        let ctx = IngestionContext {
            filter: Arc::new(AccountFilter::parse("100-200").unwrap()),
            sinks,
            cpu_core: None,
        };
        let (tx, rx) = crossbeam_channel::bounded(64);
        let handle = std::thread::spawn(move || run_ingestion_loop(ctx, rx));
        for item in items {
            tx.send(item).unwrap();
        }
        drop(tx);
        handle.join().unwrap();
    }

    #[test]
    fn filters_disallowed_logins() {
        let sink = Arc::new(Capture::default());
        run_worker(
            vec![trade(1, 50, 1000, ""), trade(2, 150, 1000, "")],
            vec![sink.clone()],
        );
        assert_eq!(sink.orders(), vec![2]);
    }

    #[test]
    fn drops_cancelled_comments_case_sensitively() {
        let sink = Arc::new(Capture::default());
        run_worker(
            vec![
                trade(1, 150, 1000, "cancelled by dealer"),
                trade(2, 150, 1000, "Cancelled by dealer"),
                trade(3, 150, 1000, "filled"),
            ],
            vec![sink.clone()],
        );
        // Only the exact lowercase marker drops a record.
        assert_eq!(sink.orders(), vec![2, 3]);
    }

    #[test]
    fn suppresses_same_tick_duplicates() {
        let sink = Arc::new(Capture::default());
        run_worker(
            vec![
                trade(1, 150, 1000, ""),
                trade(1, 150, 1000, ""),
                trade(2, 150, 1000, ""),
            ],
            vec![sink.clone()],
        );
        assert_eq!(sink.orders(), vec![1, 2]);
    }

    #[test]
    fn window_advance_reaccepts_an_order_id() {
        let sink = Arc::new(Capture::default());
        run_worker(
            vec![trade(1, 150, 1000, ""), trade(1, 150, 1001, "")],
            vec![sink.clone()],
        );
        assert_eq!(sink.orders(), vec![1, 1]);
    }

    #[test]
    fn preserves_enqueue_order() {
        let sink = Arc::new(Capture::default());
        let items = (1..=50).map(|i| trade(i, 150, 1000 + i as i64, "")).collect();
        run_worker(items, vec![sink.clone()]);
        assert_eq!(sink.orders(), (1..=50).collect::<Vec<_>>());
    }

    #[test]
    fn failing_sink_aborts_only_that_record() {
        let first = Arc::new(Capture::default());
        let last = Arc::new(Capture::default());
        run_worker(
            vec![
                trade(1, 150, 1000, ""),
                trade(2, 150, 1000, ""),
                trade(3, 150, 1000, ""),
            ],
            vec![first.clone(), Arc::new(RejectOrder(2)), last.clone()],
        );
        // Sinks before the failure still saw order 2; sinks after did not.
        assert_eq!(first.orders(), vec![1, 2, 3]);
        assert_eq!(last.orders(), vec![1, 3]);
    }

    #[test]
    fn rejected_records_do_not_claim_window_slots() {
        let sink = Arc::new(Capture::default());
        run_worker(
            vec![
                trade(9, 150, 1000, "cancelled"),
                trade(9, 150, 1000, ""),
                trade(7, 50, 1000, ""),
                trade(7, 150, 1000, ""),
            ],
            vec![sink.clone()],
        );
        // The cancelled and out-of-range deliveries never reached the dedup
        // window, so the clean ones were not mistaken for duplicates.
        assert_eq!(sink.orders(), vec![9, 7]);
    }
}
