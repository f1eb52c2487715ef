// 1.0: all the primitives live here. nothing in the maker works without these types.
// identities, fixed-point prices, token amounts, signed exposure, basis points, timestamps.
// each is a newtype over an integer so the compiler catches scale mixups.
// engine math never touches Decimal; Decimal is only for reading and printing values.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decimal places of a reference price.
pub const PRICE_DECIMALS: u32 = 4;
/// 1.0000 as a raw price.
pub const PRICE_SCALE: u128 = 10_000;
/// Decimal places of every token (collateral, long, short).
pub const TOKEN_DECIMALS: u32 = 18;
/// One whole token as a raw amount.
pub const TOKEN_SCALE: u128 = 1_000_000_000_000_000_000;
/// 100% in basis points.
pub const BPS_SCALE: u128 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl AccountId {
    /// Counterparty of mint and burn transfers in ledger logs.
    pub const ZERO: AccountId = AccountId(0);
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// Long = profit when price goes up. Short = profit when price goes down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn sign(&self) -> i128 {
        match self {
            Side::Long => 1,
            Side::Short => -1,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Long => Side::Short,
            Side::Short => Side::Long,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}

fn raw_from_decimal(value: Decimal, decimals: u32) -> Option<i128> {
    let factor = Decimal::from(10u64.checked_pow(decimals)?);
    value.checked_mul(factor)?.trunc().to_i128()
}

// saturates at Decimal::MAX/MIN; only used for display
fn raw_to_decimal(raw: i128, decimals: u32) -> Decimal {
    Decimal::try_from_i128_with_scale(raw, decimals).unwrap_or(if raw < 0 {
        Decimal::MIN
    } else {
        Decimal::MAX
    })
}

// 1.1: reference price, PRICE_SCALE fixed point. zero means "never reported".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Price(u128);

impl Price {
    pub const ZERO: Price = Price(0);

    /// A reportable price. Zero is rejected.
    #[must_use]
    pub fn new(raw: u128) -> Option<Self> {
        if raw > 0 {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Whole units, e.g. `Price::from_units(2)` is 2.0000.
    pub fn from_units(units: u64) -> Option<Self> {
        Self::new((units as u128).checked_mul(PRICE_SCALE)?)
    }

    #[must_use]
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let raw = raw_from_decimal(value, PRICE_DECIMALS)?;
        Self::new(u128::try_from(raw).ok()?)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn to_decimal(&self) -> Decimal {
        raw_to_decimal(i128::try_from(self.0).unwrap_or(i128::MAX), PRICE_DECIMALS)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// 1.2: unsigned token quantity, TOKEN_SCALE fixed point.
// token balances and collateral share this scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    /// Whole tokens, e.g. `Amount::tokens(10)`.
    pub fn tokens(units: u64) -> Self {
        Self(units as u128 * TOKEN_SCALE)
    }

    #[must_use]
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let raw = raw_from_decimal(value, TOKEN_DECIMALS)?;
        u128::try_from(raw).ok().map(Self)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(&self, other: Amount) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(&self, other: Amount) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(&self, other: Amount) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    pub fn to_decimal(&self) -> Decimal {
        raw_to_decimal(i128::try_from(self.0).unwrap_or(i128::MAX), TOKEN_DECIMALS)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// 1.3: signed token-scale quantity. net exposure and pnl.
// positive = net long / profit, negative = net short / loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SignedAmount(i128);

impl SignedAmount {
    pub fn new(raw: i128) -> Self {
        Self(raw)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        raw_from_decimal(value, TOKEN_DECIMALS).map(Self)
    }

    pub fn raw(&self) -> i128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub fn abs(&self) -> Amount {
        Amount(self.0.unsigned_abs())
    }

    /// Side of the net exposure, `None` when flat.
    pub fn side(&self) -> Option<Side> {
        match self.0 {
            n if n > 0 => Some(Side::Long),
            n if n < 0 => Some(Side::Short),
            _ => None,
        }
    }

    pub fn checked_add(&self, other: SignedAmount) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn to_decimal(&self) -> Decimal {
        raw_to_decimal(self.0, TOKEN_DECIMALS)
    }
}

impl fmt::Display for SignedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// 1.4: cost basis, PRICE_SCALE fixed point. zero when flat, positive otherwise.
// held as i128 because it only ever meets signed notionals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EntryPrice(i128);

impl EntryPrice {
    pub fn new(raw: i128) -> Self {
        Self(raw)
    }

    pub fn zero() -> Self {
        Self(0)
    }

    pub fn raw(&self) -> i128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn to_decimal(&self) -> Decimal {
        raw_to_decimal(self.0, PRICE_DECIMALS)
    }
}

impl TryFrom<Price> for EntryPrice {
    type Error = std::num::TryFromIntError;

    fn try_from(price: Price) -> Result<Self, Self::Error> {
        i128::try_from(price.raw()).map(Self)
    }
}

impl fmt::Display for EntryPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

// 1.5: basis points. 100 bps = 1%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bps(u32);

impl Bps {
    pub fn new(bps: u32) -> Self {
        Self(bps)
    }

    pub fn value(&self) -> u32 {
        self.0
    }

    pub fn as_fraction(&self) -> Decimal {
        Decimal::new(self.0 as i64, 4)
    }
}

// 1.6: millisecond timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp_millis())
    }

    pub fn from_millis(ms: i64) -> Self {
        Self(ms)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}
