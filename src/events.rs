// 11.0: every committed state change produces an event. used for audit trails
// and notifying external systems. rejected calls are logged after rollback.
// the EventPayload enum lists all event types.

use crate::types::{AccountId, Amount, EntryPrice, Price, Side, SignedAmount, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // Price events
    PriceUpdated(PriceUpdatedEvent),

    // Position events
    Minted(MintedEvent),
    Burned(BurnedEvent),

    // Collateral events
    CollateralRedeemed(CollateralRedeemedEvent),

    // Rejections
    CallRejected(CallRejectedEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdatedEvent {
    pub previous: Price,
    pub price: Price,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintedEvent {
    pub account_id: AccountId,
    pub side: Side,
    pub amount: Amount,
    pub price: Price,
    pub collateral_debit: Amount,
    pub net_exposure: SignedAmount,
    pub old_entry_price: EntryPrice,
    pub new_entry_price: EntryPrice,
    pub realized_pnl: SignedAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnedEvent {
    pub account_id: AccountId,
    pub side: Side,
    pub amount: Amount,
    pub net_exposure: SignedAmount,
    pub entry_price: EntryPrice,
    pub realized_pnl: SignedAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollateralRedeemedEvent {
    pub account_id: AccountId,
    pub amount: Amount,
    pub collateral_remaining: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Mint(Side),
    Burn(Side),
    Redeem,
    SetPrice,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRejectedEvent {
    pub account_id: AccountId,
    pub operation: Operation,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_round_trips_through_json() {
        let event = Event::new(
            EventId(3),
            Timestamp::from_millis(42),
            EventPayload::CallRejected(CallRejectedEvent {
                account_id: AccountId(2),
                operation: Operation::Mint(Side::Short),
                reason: "Reference price has not been set".to_string(),
            }),
        );

        let json = serde_json::to_string(&event).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, EventId(3));
        match back.payload {
            EventPayload::CallRejected(rejected) => {
                assert_eq!(rejected.operation, Operation::Mint(Side::Short));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }
}
