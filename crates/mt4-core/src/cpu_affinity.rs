//! CPU affinity utilities for binding threads to specific cores.
//!
//! The single trade ingestion thread benefits from a dedicated core when the
//! gateway shares a host with latency-sensitive consumers, avoiding scheduler
//! jitter on the dispatch path. Wraps the `core_affinity` crate behind an
//! optional config knob.

use tracing::{info, warn};

/// Bind the current thread to the specified CPU core.
///
/// Returns `true` if the binding succeeded, `false` if the core ID is
/// invalid or the OS rejected the request. Failure is logged and otherwise
/// harmless; the thread keeps running unpinned.
pub fn bind_to_core(core_id: usize) -> bool {
    let core_ids = core_affinity::get_core_ids().unwrap_or_default();
    match core_ids.get(core_id) {
        Some(core) => {
            let ok = core_affinity::set_for_current(*core);
            if ok {
                info!("bound thread to CPU core {core_id}");
            } else {
                warn!("OS rejected CPU affinity for core {core_id}");
            }
            ok
        }
        None => {
            warn!(
                "CPU core {core_id} not available (system has {} cores)",
                core_ids.len()
            );
            false
        }
    }
}

/// Bind the current thread when a core is configured.
///
/// `None` and negative ids both mean "no affinity".
pub fn maybe_bind(core_id: Option<i32>) {
    if let Some(id) = core_id
        && id >= 0
    {
        bind_to_core(id as usize);
    }
}
