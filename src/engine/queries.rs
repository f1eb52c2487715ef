//! Read-only projections of positions at the current reference price.
//! A caller with no position reads zeroed values.

use super::core::Maker;
use super::results::MakerError;
use crate::math::add_amounts;
use crate::position::{Position, PositionSummary};
use crate::types::{AccountId, Amount, SignedAmount};

impl Maker {
    pub fn get_position(&self, account_id: AccountId) -> Position {
        self.position(account_id)
    }

    pub fn get_collateral(&self, account_id: AccountId) -> Amount {
        self.position(account_id).collateral_locked
    }

    pub fn get_net_exposure(&self, account_id: AccountId) -> Result<SignedAmount, MakerError> {
        Ok(self.position(account_id).net_exposure()?)
    }

    pub fn get_required_collateral(&self, account_id: AccountId) -> Result<Amount, MakerError> {
        Ok(self
            .position(account_id)
            .required_collateral(self.get_price(), self.config.collateral_ratio)?)
    }

    /// Unrealized pnl of the current net exposure.
    pub fn get_pnl(&self, account_id: AccountId) -> Result<SignedAmount, MakerError> {
        Ok(self.position(account_id).unrealized_pnl(self.get_price())?)
    }

    pub fn get_realized_pnl(&self, account_id: AccountId) -> SignedAmount {
        self.position(account_id).realized_pnl
    }

    pub fn get_total_pnl(&self, account_id: AccountId) -> Result<SignedAmount, MakerError> {
        Ok(self.position(account_id).total_pnl(self.get_price())?)
    }

    pub fn get_redeemable_collateral(&self, account_id: AccountId) -> Result<Amount, MakerError> {
        Ok(self
            .position(account_id)
            .redeemable_collateral(self.get_price(), self.config.collateral_ratio)?)
    }

    pub fn summary(&self, account_id: AccountId) -> Result<PositionSummary, MakerError> {
        Ok(self
            .position(account_id)
            .summarize(self.get_price(), self.config.collateral_ratio)?)
    }

    pub fn positions_iter(&self) -> impl Iterator<Item = (&AccountId, &Position)> {
        self.state.positions.iter()
    }

    pub fn total_collateral_locked(&self) -> Result<Amount, MakerError> {
        let mut total = Amount::zero();
        for position in self.state.positions.values() {
            total = add_amounts(total, position.collateral_locked)?;
        }
        Ok(total)
    }

    /// Collateral the maker actually holds on the collateral ledger.
    pub fn pool_collateral_balance(&self) -> Amount {
        self.state.assets.collateral.balance_of(self.id)
    }

    /// Sum of locked collateral is covered by the maker's balance.
    pub fn is_pool_solvent(&self) -> bool {
        self.total_collateral_locked()
            .map(|locked| locked <= self.pool_collateral_balance())
            .unwrap_or(false)
    }

    /// Recorded balances equal the token ledgers' balances for `account_id`.
    /// Holders moving tokens directly on a ledger break this.
    pub fn position_mirrors_ledger(&self, account_id: AccountId) -> bool {
        let position = self.position(account_id);
        let assets = &self.state.assets;
        position.long_balance == assets.long.balance_of(account_id)
            && position.short_balance == assets.short.balance_of(account_id)
    }
}
