//! Minting long and short tokens against collateral.

use super::core::Maker;
use super::results::{MakerError, MintResult};
use crate::config::CollateralPolicy;
use crate::events::{EventPayload, MintedEvent, Operation};
use crate::math::add_amounts;
use crate::position::{apply_mint, mint_collateral_debit};
use crate::types::{AccountId, Amount, Side};

impl Maker {
    pub fn mint_long_tokens(&mut self, caller: AccountId, amount: Amount) -> Result<MintResult, MakerError> {
        self.mint(caller, Side::Long, amount)
    }

    pub fn mint_short_tokens(&mut self, caller: AccountId, amount: Amount) -> Result<MintResult, MakerError> {
        self.mint(caller, Side::Short, amount)
    }

    /// Mint `amount` of `side` to `caller`, pulling collateral through the
    /// caller's allowance to the maker.
    pub fn mint(&mut self, caller: AccountId, side: Side, amount: Amount) -> Result<MintResult, MakerError> {
        self.atomically(caller, Operation::Mint(side), |maker, events| {
            maker.execute_mint(caller, side, amount, events)
        })
    }

    fn execute_mint(
        &mut self,
        caller: AccountId,
        side: Side,
        amount: Amount,
        events: &mut Vec<EventPayload>,
    ) -> Result<MintResult, MakerError> {
        if amount.is_zero() {
            return Err(MakerError::InvalidInput("amount must be positive"));
        }
        let price = self.state.oracle.require_price()?;
        let ratio = self.config.collateral_ratio;

        let before = self.position(caller);
        let update = apply_mint(&before, side, amount, price)?;
        let mut after = update.position;

        let collateral_debit = match self.config.collateral_policy {
            CollateralPolicy::PerMintNotional => mint_collateral_debit(amount, price, ratio)?,
            CollateralPolicy::TopUpToRequired => after
                .required_collateral(price, ratio)?
                .saturating_sub(after.collateral_locked),
        };
        after.collateral_locked = add_amounts(after.collateral_locked, collateral_debit)?;

        let maker_id = self.id;
        if !collateral_debit.is_zero() {
            self.state
                .assets
                .collateral
                .transfer_from(maker_id, caller, maker_id, collateral_debit)?;
        }
        self.state
            .assets
            .token_mut(side)
            .mint(maker_id, caller, amount)?;
        self.store_position(caller, after);

        events.push(EventPayload::Minted(MintedEvent {
            account_id: caller,
            side,
            amount,
            price,
            collateral_debit,
            net_exposure: after.net_exposure()?,
            old_entry_price: before.entry_price,
            new_entry_price: after.entry_price,
            realized_pnl: update.realized_pnl,
        }));

        Ok(MintResult {
            account_id: caller,
            side,
            amount,
            price,
            collateral_debit,
            realized_pnl: update.realized_pnl,
            position: after,
        })
    }
}
