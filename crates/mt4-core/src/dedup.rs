//! Trade deduplication for redundant pump delivery.
//!
//! With `pump_count` parallel terminal sessions, every trade notification
//! arrives up to `pump_count` times. [`TradeDedupWindow`] suppresses the
//! repeats: it remembers the order ids seen at the newest venue timestamp
//! and drops any re-delivery within that second-resolution tick. A trade
//! with a strictly newer timestamp clears the set and advances the window,
//! so memory stays bounded to one tick's worth of orders.
//!
//! The trade-off is accepted: duplicates are only suppressed while the
//! window sits on their tick, and an order id can be accepted again once
//! the window has moved past it.

use ahash::AHashSet;

/// Bounded-lifetime duplicate suppressor keyed on `(timestamp, order_id)`.
///
/// # Thread safety
///
/// Not thread-safe. Owned exclusively by the trade ingestion worker; no
/// other thread reads or mutates it.
#[derive(Debug, Default)]
pub struct TradeDedupWindow {
    last_trade_time: i64,
    seen_orders: AHashSet<u64>,
}

impl TradeDedupWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether `(timestamp, order_id)` is new within the current tick.
    ///
    /// A timestamp strictly greater than the window's current one clears the
    /// set and advances the window *before* the membership test. Returns
    /// `true` if the order id had not been seen yet (and records it),
    /// `false` for a duplicate.
    #[inline]
    pub fn check_and_insert(&mut self, timestamp: i64, order_id: u64) -> bool {
        if timestamp > self.last_trade_time {
            self.seen_orders.clear();
            self.last_trade_time = timestamp;
        }
        self.seen_orders.insert(order_id)
    }

    /// Venue timestamp the window currently covers.
    pub fn last_trade_time(&self) -> i64 {
        self.last_trade_time
    }

    /// Number of distinct order ids recorded for the current tick.
    pub fn seen_count(&self) -> usize {
        self.seen_orders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_within_tick_suppressed() {
        let mut w = TradeDedupWindow::new();
        assert!(w.check_and_insert(1000, 1));
        assert!(!w.check_and_insert(1000, 1)); // redundant delivery
        assert!(w.check_and_insert(1000, 2)); // different order, same tick
        assert_eq!(w.seen_count(), 2);
    }

    #[test]
    fn tick_advance_resets_the_set() {
        let mut w = TradeDedupWindow::new();
        assert!(w.check_and_insert(1000, 1));
        assert!(w.check_and_insert(1001, 1)); // window advanced, id accepted again
        assert_eq!(w.last_trade_time(), 1001);
        assert_eq!(w.seen_count(), 1);
    }

    #[test]
    fn older_timestamp_does_not_reset() {
        let mut w = TradeDedupWindow::new();
        assert!(w.check_and_insert(1001, 7));
        assert!(!w.check_and_insert(1000, 7)); // still in the current set
        assert!(w.check_and_insert(1000, 8)); // unseen id joins the current tick
        assert_eq!(w.last_trade_time(), 1001);
    }

    #[test]
    fn reset_happens_before_membership_test() {
        let mut w = TradeDedupWindow::new();
        assert!(w.check_and_insert(1000, 1));
        assert!(w.check_and_insert(1000, 2));
        assert!(w.check_and_insert(1001, 2)); // cleared first, so 2 is new again
        assert!(!w.check_and_insert(1001, 2));
    }
}
