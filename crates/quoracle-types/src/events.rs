//! Notifications emitted by the oracle on committed state changes.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

use crate::Address;

/// A notification emitted after a successful state-mutating operation.
///
/// Internally tagged enums are buffered by serde in a form that has no
/// `u128`, so prices travel as decimal strings.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OracleEvent {
    /// The one-shot initialization latch was set.
    OracleInitialized { initializer: Address },
    /// Ownership moved to a new account.
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
    /// A price was accepted for `(base, quote)`.
    PriceUpdated {
        base: Address,
        quote: Address,
        /// Normalized price.
        #[serde_as(as = "DisplayFromStr")]
        price: u128,
        /// Absolute expiration (Unix ms).
        expiration: u64,
    },
}

impl OracleEvent {
    /// Event name as exposed to subscribers.
    pub fn name(&self) -> &'static str {
        match self {
            OracleEvent::OracleInitialized { .. } => "OracleInitialized",
            OracleEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            OracleEvent::PriceUpdated { .. } => "PriceUpdated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let ev = OracleEvent::OracleInitialized {
            initializer: Address::repeat(1),
        };
        assert_eq!(ev.name(), "OracleInitialized");
    }

    #[test]
    fn test_event_tagged_serialization() {
        let ev = OracleEvent::PriceUpdated {
            base: Address::repeat(1),
            quote: Address::repeat(2),
            price: 1000,
            expiration: 4_600_000,
        };
        let json = serde_json::to_value(&ev).expect("serialize");
        assert_eq!(json["event"], "price_updated");
        assert_eq!(json["price"], "1000");
        let back: OracleEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, ev);
    }

    #[test]
    fn test_price_above_u64_round_trips() {
        let ev = OracleEvent::PriceUpdated {
            base: Address::repeat(1),
            quote: Address::repeat(2),
            price: 50_000 * 10u128.pow(18),
            expiration: 4_600_000,
        };
        let text = serde_json::to_string(&ev).expect("serialize");
        assert!(text.contains("\"price\":\"50000000000000000000000\""));
        let back: OracleEvent = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, ev);
    }

    #[test]
    fn test_admin_events_round_trip() {
        let ev = OracleEvent::OwnershipTransferred {
            previous_owner: Address::repeat(1),
            new_owner: Address::repeat(2),
        };
        let text = serde_json::to_string(&ev).expect("serialize");
        let back: OracleEvent = serde_json::from_str(&text).expect("deserialize");
        assert_eq!(back, ev);
    }
}
