//! Core event types pushed by the terminal and forwarded to sinks.

pub mod enums;
pub mod quote;
pub mod trade;

pub use enums::*;
pub use quote::*;
pub use trade::*;
