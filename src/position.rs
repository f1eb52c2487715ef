// 4.0: per-user position. net = long - short, pnl = net * (price - entry).
// required collateral = ratio * |net| * entry - pnl, floored at zero.
// 4.1 has the mint/burn transitions at the bottom.
//
// a user that never minted reads as Position::default(); every formula is
// well defined at zero so there is no existence flag.

use crate::math::{
    checked_add, checked_mul, checked_sub, div_ceil, div_floor, mul_div_ceil, non_negative,
    to_signed, MathError,
};
use crate::types::{Amount, Bps, EntryPrice, Price, Side, SignedAmount, BPS_SCALE, PRICE_SCALE};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub long_balance: Amount,
    pub short_balance: Amount,
    pub collateral_locked: Amount,
    pub entry_price: EntryPrice,
    pub realized_pnl: SignedAmount,
}

/// Lifecycle view. `FlatGrossOpen` holds equal long and short balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Empty,
    NetLong,
    NetShort,
    FlatGrossOpen,
}

impl Position {
    pub fn balance(&self, side: Side) -> Amount {
        match side {
            Side::Long => self.long_balance,
            Side::Short => self.short_balance,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.long_balance.is_zero() && self.short_balance.is_zero()
    }

    pub fn status(&self) -> PositionStatus {
        if self.is_empty() {
            return PositionStatus::Empty;
        }
        match self.long_balance.cmp(&self.short_balance) {
            std::cmp::Ordering::Greater => PositionStatus::NetLong,
            std::cmp::Ordering::Less => PositionStatus::NetShort,
            std::cmp::Ordering::Equal => PositionStatus::FlatGrossOpen,
        }
    }

    pub fn net_exposure(&self) -> Result<SignedAmount, MathError> {
        let net = checked_sub(
            to_signed(self.long_balance.raw())?,
            to_signed(self.short_balance.raw())?,
        )?;
        Ok(SignedAmount::new(net))
    }

    // 4.1: paper gains/losses at the reference price
    pub fn unrealized_pnl(&self, price: Price) -> Result<SignedAmount, MathError> {
        calculate_unrealized_pnl(self.net_exposure()?, self.entry_price, price)
    }

    pub fn total_pnl(&self, price: Price) -> Result<SignedAmount, MathError> {
        let unrealized = self.unrealized_pnl(price)?;
        unrealized
            .checked_add(self.realized_pnl)
            .ok_or(MathError::Overflow)
    }

    pub fn required_collateral(&self, price: Price, ratio: Bps) -> Result<Amount, MathError> {
        calculate_required_collateral(self.net_exposure()?, self.entry_price, price, ratio)
    }

    /// Locked collateral above the requirement. Zero when under water.
    pub fn redeemable_collateral(&self, price: Price, ratio: Bps) -> Result<Amount, MathError> {
        let required = self.required_collateral(price, ratio)?;
        Ok(self.collateral_locked.saturating_sub(required))
    }

    pub fn summarize(&self, price: Price, ratio: Bps) -> Result<PositionSummary, MathError> {
        let required_collateral = self.required_collateral(price, ratio)?;
        Ok(PositionSummary {
            position: *self,
            status: self.status(),
            net_exposure: self.net_exposure()?,
            unrealized_pnl: self.unrealized_pnl(price)?,
            required_collateral,
            redeemable_collateral: self.collateral_locked.saturating_sub(required_collateral),
        })
    }
}

/// Every derived figure of a position at one reference price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSummary {
    pub position: Position,
    pub status: PositionStatus,
    pub net_exposure: SignedAmount,
    pub unrealized_pnl: SignedAmount,
    pub required_collateral: Amount,
    pub redeemable_collateral: Amount,
}

// 4.2: the pnl formula, rounded toward negative infinity
pub fn calculate_unrealized_pnl(
    net: SignedAmount,
    entry_price: EntryPrice,
    price: Price,
) -> Result<SignedAmount, MathError> {
    let move_since_entry = checked_sub(to_signed(price.raw())?, entry_price.raw())?;
    let pnl = div_floor(
        checked_mul(net.raw(), move_since_entry)?,
        to_signed(PRICE_SCALE)?,
    )?;
    Ok(SignedAmount::new(pnl))
}

// 4.3: margin on the net notional at entry, minus pnl. each division rounds up.
pub fn calculate_required_collateral(
    net: SignedAmount,
    entry_price: EntryPrice,
    price: Price,
    ratio: Bps,
) -> Result<Amount, MathError> {
    let entry_notional = div_ceil(
        checked_mul(to_signed(net.abs().raw())?, entry_price.raw())?,
        to_signed(PRICE_SCALE)?,
    )?;
    let margin = div_ceil(
        checked_mul(entry_notional, ratio.value() as i128)?,
        to_signed(BPS_SCALE)?,
    )?;
    let pnl = calculate_unrealized_pnl(net, entry_price, price)?;
    Ok(non_negative(checked_sub(margin, pnl.raw())?))
}

/// Collateral a single mint must bring: ratio of the minted notional at `price`.
pub fn mint_collateral_debit(amount: Amount, price: Price, ratio: Bps) -> Result<Amount, MathError> {
    let notional = mul_div_ceil(amount.raw(), price.raw(), PRICE_SCALE)?;
    let debit = mul_div_ceil(notional, ratio.value() as u128, BPS_SCALE)?;
    Ok(Amount::new(debit))
}

// 4.4: cost basis after the net exposure moves by `delta` at `price`.
// flat -> zero. shrinking on the same side -> unchanged.
// flipping -> the remainder opens fresh at `price`; the closed leg is realized.
// growing or opening -> notional-weighted average.
pub fn rebase_entry_price(
    net_before: SignedAmount,
    entry_before: EntryPrice,
    delta: i128,
    price: Price,
) -> Result<EntryPrice, MathError> {
    let n0 = net_before.raw();
    let n1 = checked_add(n0, delta)?;

    if n1 == 0 {
        return Ok(EntryPrice::zero());
    }
    if shrinks_on_same_side(n0, n1) {
        return Ok(entry_before);
    }
    if crosses_zero(n0, n1) {
        return EntryPrice::try_from(price).map_err(|_| MathError::Overflow);
    }

    let old_notional = checked_mul(n0, entry_before.raw())?;
    let added_notional = checked_mul(delta, to_signed(price.raw())?)?;
    let total = checked_add(old_notional, added_notional)?;
    // truncates toward zero
    let entry = total.checked_div(n1).ok_or(MathError::Overflow)?;
    Ok(EntryPrice::new(entry))
}

fn shrinks_on_same_side(n0: i128, n1: i128) -> bool {
    n0 != 0 && n1 != 0 && n0.signum() == n1.signum() && n1.unsigned_abs() < n0.unsigned_abs()
}

fn crosses_zero(n0: i128, n1: i128) -> bool {
    n0 != 0 && n1 != 0 && n0.signum() != n1.signum()
}

// part of the old exposure that a move from n0 to n1 closes
fn closed_amount(n0: i128, n1: i128) -> u128 {
    if n1 == 0 || shrinks_on_same_side(n0, n1) {
        n0.unsigned_abs() - n1.unsigned_abs()
    } else if crosses_zero(n0, n1) {
        n0.unsigned_abs()
    } else {
        0
    }
}

// gain/loss of the closed part of the old exposure, realized at `price`
fn realize_closed(
    net_before: SignedAmount,
    closed: u128,
    entry_before: EntryPrice,
    price: Price,
) -> Result<SignedAmount, MathError> {
    if closed == 0 {
        return Ok(SignedAmount::zero());
    }
    let closed_signed = checked_mul(to_signed(closed)?, net_before.raw().signum())?;
    calculate_unrealized_pnl(SignedAmount::new(closed_signed), entry_before, price)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionUpdate {
    pub position: Position,
    pub realized_pnl: SignedAmount,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    #[error("Insufficient {side} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        side: Side,
        requested: Amount,
        available: Amount,
    },

    #[error(transparent)]
    Math(#[from] MathError),
}

// 4.5: mint `amount` on `side` at `price`. collateral is left to the caller.
pub fn apply_mint(
    position: &Position,
    side: Side,
    amount: Amount,
    price: Price,
) -> Result<PositionUpdate, PositionError> {
    let net_before = position.net_exposure()?;
    let delta = checked_mul(to_signed(amount.raw())?, side.sign())?;
    let n1 = checked_add(net_before.raw(), delta)?;

    let entry_price = rebase_entry_price(net_before, position.entry_price, delta, price)?;

    let closed = closed_amount(net_before.raw(), n1);
    let realized = realize_closed(net_before, closed, position.entry_price, price)?;

    let mut next = *position;
    match side {
        Side::Long => {
            next.long_balance = position
                .long_balance
                .checked_add(amount)
                .ok_or(MathError::Overflow)?
        }
        Side::Short => {
            next.short_balance = position
                .short_balance
                .checked_add(amount)
                .ok_or(MathError::Overflow)?
        }
    }
    next.entry_price = entry_price;
    next.realized_pnl = position
        .realized_pnl
        .checked_add(realized)
        .ok_or(MathError::Overflow)?;

    Ok(PositionUpdate {
        position: next,
        realized_pnl: realized,
    })
}

// 4.6: burn `amount` from `side`. the basis only moves when net returns to zero.
pub fn apply_burn(
    position: &Position,
    side: Side,
    amount: Amount,
    price: Price,
) -> Result<PositionUpdate, PositionError> {
    let available = position.balance(side);
    let remaining = available
        .checked_sub(amount)
        .ok_or(PositionError::InsufficientBalance {
            side,
            requested: amount,
            available,
        })?;

    let net_before = position.net_exposure()?;
    let delta = checked_mul(to_signed(amount.raw())?, -side.sign())?;
    let n1 = checked_add(net_before.raw(), delta)?;

    let closed = closed_amount(net_before.raw(), n1);
    let realized = realize_closed(net_before, closed, position.entry_price, price)?;

    let mut next = *position;
    match side {
        Side::Long => next.long_balance = remaining,
        Side::Short => next.short_balance = remaining,
    }
    if n1 == 0 {
        next.entry_price = EntryPrice::zero();
    }
    next.realized_pnl = position
        .realized_pnl
        .checked_add(realized)
        .ok_or(MathError::Overflow)?;

    Ok(PositionUpdate {
        position: next,
        realized_pnl: realized,
    })
}
