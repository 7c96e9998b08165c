//! Connector registry: factory for creating terminal connectors from config.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use mt4_core::config::PumpSettings;

use crate::sim::SimConnector;
use crate::terminal::TerminalConnector;

/// Create a [`TerminalConnector`] based on the `terminal` field in the
/// config.
///
/// `"sim"` is the built-in in-process venue. Real terminal integrations
/// (each wrapping its vendor client library) register here as they are
/// added.
pub fn create_connector(settings: &PumpSettings) -> Result<Arc<dyn TerminalConnector>> {
    match settings.terminal.to_lowercase().as_str() {
        "sim" => Ok(Arc::new(SimConnector::new(true))),
        other => Err(anyhow!("Unknown terminal: {other}")),
    }
}
