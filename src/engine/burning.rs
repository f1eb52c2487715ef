//! Burning long and short tokens. Collateral stays locked until redeemed.

use super::core::Maker;
use super::results::{BurnResult, MakerError};
use crate::events::{BurnedEvent, EventPayload, Operation};
use crate::position::apply_burn;
use crate::types::{AccountId, Amount, Side};

impl Maker {
    pub fn burn_long_tokens(&mut self, caller: AccountId, amount: Amount) -> Result<BurnResult, MakerError> {
        self.burn(caller, Side::Long, amount)
    }

    pub fn burn_short_tokens(&mut self, caller: AccountId, amount: Amount) -> Result<BurnResult, MakerError> {
        self.burn(caller, Side::Short, amount)
    }

    pub fn burn(&mut self, caller: AccountId, side: Side, amount: Amount) -> Result<BurnResult, MakerError> {
        self.atomically(caller, Operation::Burn(side), |maker, events| {
            maker.execute_burn(caller, side, amount, events)
        })
    }

    fn execute_burn(
        &mut self,
        caller: AccountId,
        side: Side,
        amount: Amount,
        events: &mut Vec<EventPayload>,
    ) -> Result<BurnResult, MakerError> {
        if amount.is_zero() {
            return Err(MakerError::InvalidInput("amount must be positive"));
        }

        let before = self.position(caller);
        let update = apply_burn(&before, side, amount, self.state.oracle.reference_price())?;
        let after = update.position;

        let maker_id = self.id;
        self.state
            .assets
            .token_mut(side)
            .burn(maker_id, caller, amount)?;
        self.store_position(caller, after);

        events.push(EventPayload::Burned(BurnedEvent {
            account_id: caller,
            side,
            amount,
            net_exposure: after.net_exposure()?,
            entry_price: after.entry_price,
            realized_pnl: update.realized_pnl,
        }));

        Ok(BurnResult {
            account_id: caller,
            side,
            amount,
            realized_pnl: update.realized_pnl,
            position: after,
        })
    }
}
