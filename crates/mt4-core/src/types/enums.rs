//! Enumerations used throughout the pump gateway.

use serde::{Deserialize, Serialize};

/// Kind of trade transaction pushed by the terminal.
///
/// The set is venue-defined and the pipeline treats it as opaque: no stage
/// branches on a specific variant, records are forwarded with their kind
/// attached. Cancellation is not a variant; the venue flags cancelled trades
/// through the record comment (see [`crate::types::trade::CANCELLED_MARKER`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// A position or pending order was opened.
    Open,
    /// A position was closed.
    Close,
    /// An existing order was modified.
    Modify,
    /// An order was deleted.
    Delete,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Close => write!(f, "close"),
            Self::Modify => write!(f, "modify"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_lowercase() {
        assert_eq!(TransactionType::Open.to_string(), "open");
        assert_eq!(TransactionType::Delete.to_string(), "delete");
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&TransactionType::Close).unwrap();
        assert_eq!(json, r#""close""#);
        let back: TransactionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransactionType::Close);
    }
}
