//! Redeeming surplus collateral.

use super::core::Maker;
use super::results::{MakerError, RedeemResult};
use crate::events::{CollateralRedeemedEvent, EventPayload, Operation};
use crate::types::{AccountId, Amount};

impl Maker {
    /// Withdraw `amount` of locked collateral, never below the requirement.
    pub fn redeem_collateral(&mut self, caller: AccountId, amount: Amount) -> Result<RedeemResult, MakerError> {
        self.atomically(caller, Operation::Redeem, |maker, events| {
            maker.execute_redeem(caller, amount, events)
        })
    }

    fn execute_redeem(
        &mut self,
        caller: AccountId,
        amount: Amount,
        events: &mut Vec<EventPayload>,
    ) -> Result<RedeemResult, MakerError> {
        if amount.is_zero() {
            return Err(MakerError::InvalidInput("amount must be positive"));
        }

        let mut position = self.position(caller);
        let redeemable = position.redeemable_collateral(
            self.state.oracle.reference_price(),
            self.config.collateral_ratio,
        )?;
        if amount > redeemable {
            return Err(MakerError::InsufficientCollateral {
                requested: amount,
                redeemable,
            });
        }

        // amount <= redeemable <= locked
        position.collateral_locked = position.collateral_locked.saturating_sub(amount);

        let maker_id = self.id;
        self.state
            .assets
            .collateral
            .transfer(maker_id, caller, amount)?;
        self.store_position(caller, position);

        events.push(EventPayload::CollateralRedeemed(CollateralRedeemedEvent {
            account_id: caller,
            amount,
            collateral_remaining: position.collateral_locked,
        }));

        Ok(RedeemResult {
            account_id: caller,
            amount,
            position,
        })
    }
}
