// 8.0 engine/core.rs: the maker. holds the oracle, the three ledgers, every
// position, and the audit log.

use super::results::MakerError;
use crate::config::MakerConfig;
use crate::events::{CallRejectedEvent, Event, EventId, EventPayload, Operation};
use crate::ledger::{LedgerCheckpoint, TokenLedger};
use crate::oracle::PriceOracle;
use crate::position::Position;
use crate::types::{AccountId, Amount, Side, Timestamp};
use std::collections::HashMap;

/// The three ledgers the maker moves tokens through.
#[derive(Debug, Clone)]
pub struct MakerAssets {
    pub collateral: TokenLedger,
    pub long: TokenLedger,
    pub short: TokenLedger,
}

impl MakerAssets {
    pub fn token(&self, side: Side) -> &TokenLedger {
        match side {
            Side::Long => &self.long,
            Side::Short => &self.short,
        }
    }

    pub fn token_mut(&mut self, side: Side) -> &mut TokenLedger {
        match side {
            Side::Long => &mut self.long,
            Side::Short => &mut self.short,
        }
    }

    fn checkpoint(&self, accounts: &[AccountId]) -> AssetsCheckpoint {
        AssetsCheckpoint {
            collateral: self.collateral.checkpoint(accounts),
            long: self.long.checkpoint(accounts),
            short: self.short.checkpoint(accounts),
        }
    }

    fn restore(&mut self, checkpoint: AssetsCheckpoint) {
        self.collateral.restore(checkpoint.collateral);
        self.long.restore(checkpoint.long);
        self.short.restore(checkpoint.short);
    }

    fn retain_recent_events(&mut self, keep: usize) {
        self.collateral.retain_recent_events(keep);
        self.long.retain_recent_events(keep);
        self.short.retain_recent_events(keep);
    }
}

struct AssetsCheckpoint {
    collateral: LedgerCheckpoint,
    long: LedgerCheckpoint,
    short: LedgerCheckpoint,
}

// what one call can touch: the oracle, the caller's position, and the
// caller's and the maker's ledger entries
struct CallCheckpoint {
    oracle: PriceOracle,
    account_id: AccountId,
    position: Option<Position>,
    assets: AssetsCheckpoint,
}

#[derive(Debug)]
pub(super) struct MarketState {
    pub(super) oracle: PriceOracle,
    pub(super) assets: MakerAssets,
    pub(super) positions: HashMap<AccountId, Position>,
}

/** 8.1: maker facade. all state lives here */
#[derive(Debug)]
pub struct Maker {
    pub(super) id: AccountId,
    pub(super) config: MakerConfig,
    pub(super) state: MarketState,
    pub(super) events: Vec<Event>,
    pub(super) next_event_id: u64,
    pub(super) current_time: Timestamp,
}

impl Maker {
    /// `id` is the account the maker holds collateral under and mints as.
    /// The long and short ledgers must be handed to `id` before mints succeed.
    pub fn new(
        id: AccountId,
        config: MakerConfig,
        assets: MakerAssets,
        price_setter: AccountId,
    ) -> Result<Self, MakerError> {
        config.validate()?;

        for side in [Side::Long, Side::Short] {
            let ledger = assets.token(side);
            if ledger.owner() != id {
                tracing::info!(
                    symbol = ledger.symbol(),
                    owner = %ledger.owner(),
                    maker = %id,
                    "{side} token not yet owned by the maker"
                );
            }
        }
        tracing::info!(symbol = %config.symbol, maker = %id, "maker created");

        Ok(Self {
            id,
            config,
            state: MarketState {
                oracle: PriceOracle::new(price_setter),
                assets,
                positions: HashMap::new(),
            },
            events: Vec::new(),
            next_event_id: 1,
            current_time: Timestamp::from_millis(0),
        })
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn config(&self) -> &MakerConfig {
        &self.config
    }

    pub fn set_time(&mut self, timestamp: Timestamp) {
        self.current_time = timestamp;
    }

    pub fn time(&self) -> Timestamp {
        self.current_time
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.current_time = Timestamp::from_millis(self.current_time.as_millis() + millis);
    }

    pub fn assets(&self) -> &MakerAssets {
        &self.state.assets
    }

    /// Direct ledger access, as any account could call the token contracts.
    /// Bypasses the maker's bookkeeping.
    pub fn assets_mut(&mut self) -> &mut MakerAssets {
        &mut self.state.assets
    }

    pub fn oracle(&self) -> &PriceOracle {
        &self.state.oracle
    }

    /// Lets the maker pull up to `amount` of `user`'s collateral.
    pub fn approve_collateral(&mut self, user: AccountId, amount: Amount) {
        let spender = self.id;
        self.state.assets.collateral.approve(user, spender, amount);
        self.state
            .assets
            .retain_recent_events(self.config.engine.max_events);
    }

    pub fn recent_events(&self, count: usize) -> &[Event] {
        let start = self.events.len().saturating_sub(count);
        &self.events[start..]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(super) fn position(&self, account_id: AccountId) -> Position {
        self.state
            .positions
            .get(&account_id)
            .copied()
            .unwrap_or_default()
    }

    // zeroed positions are dropped, absence reads the same
    pub(super) fn store_position(&mut self, account_id: AccountId, position: Position) {
        if position == Position::default() {
            self.state.positions.remove(&account_id);
        } else {
            self.state.positions.insert(account_id, position);
        }
    }

    // runs `call` as one transaction: on error every ledger, position and
    // oracle change is rolled back and only the rejection is logged.
    // `call` may only touch `account_id` and the maker's own entries.
    pub(super) fn atomically<T>(
        &mut self,
        account_id: AccountId,
        operation: Operation,
        call: impl FnOnce(&mut Self, &mut Vec<EventPayload>) -> Result<T, MakerError>,
    ) -> Result<T, MakerError> {
        let checkpoint = self.checkpoint(account_id);
        let mut pending = Vec::new();

        match call(self, &mut pending) {
            Ok(value) => {
                for payload in pending {
                    self.emit_event(payload);
                }
                Ok(value)
            }
            Err(err) => {
                self.restore(checkpoint);
                tracing::warn!(account = %account_id, ?operation, error = %err, "call rejected");
                self.emit_event(EventPayload::CallRejected(CallRejectedEvent {
                    account_id,
                    operation,
                    reason: err.to_string(),
                }));
                Err(err)
            }
        }
    }

    fn checkpoint(&self, account_id: AccountId) -> CallCheckpoint {
        CallCheckpoint {
            oracle: self.state.oracle.clone(),
            account_id,
            position: self.state.positions.get(&account_id).copied(),
            assets: self.state.assets.checkpoint(&[account_id, self.id]),
        }
    }

    fn restore(&mut self, checkpoint: CallCheckpoint) {
        self.state.oracle = checkpoint.oracle;
        match checkpoint.position {
            Some(position) => self.state.positions.insert(checkpoint.account_id, position),
            None => self.state.positions.remove(&checkpoint.account_id),
        };
        self.state.assets.restore(checkpoint.assets);
    }

    pub(super) fn emit_event(&mut self, payload: EventPayload) {
        let event = Event::new(EventId(self.next_event_id), self.current_time, payload);
        self.next_event_id += 1;

        tracing::debug!(event_id = event.id.0, payload = ?event.payload, "maker event");

        self.events.push(event);

        if self.events.len() > self.config.engine.max_events {
            let drain_count = self.events.len() - self.config.engine.max_events;
            self.events.drain(0..drain_count);
        }
        // never mid-call, a checkpoint holds log lengths
        self.state
            .assets
            .retain_recent_events(self.config.engine.max_events);
    }
}
