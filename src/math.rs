//! Checked fixed-point helpers.
//!
//! Every multiplication runs in 128-bit integers and every division states its
//! rounding direction. Callers pick the direction that favours the pool:
//! collateral owed rounds up, value owed to a user rounds down.

use crate::types::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("division by zero")]
    DivisionByZero,
}

pub fn mul_div_ceil(a: u128, b: u128, denominator: u128) -> Result<u128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let product = a.checked_mul(b).ok_or(MathError::Overflow)?;
    let quotient = product / denominator;
    if product % denominator == 0 {
        Ok(quotient)
    } else {
        quotient.checked_add(1).ok_or(MathError::Overflow)
    }
}

/// Signed division rounding toward negative infinity.
pub fn div_floor(numerator: i128, denominator: i128) -> Result<i128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let quotient = numerator.checked_div(denominator).ok_or(MathError::Overflow)?;
    let remainder = numerator % denominator;
    if remainder != 0 && ((remainder < 0) != (denominator < 0)) {
        quotient.checked_sub(1).ok_or(MathError::Overflow)
    } else {
        Ok(quotient)
    }
}

/// Signed division rounding toward positive infinity.
pub fn div_ceil(numerator: i128, denominator: i128) -> Result<i128, MathError> {
    if denominator == 0 {
        return Err(MathError::DivisionByZero);
    }
    let quotient = numerator.checked_div(denominator).ok_or(MathError::Overflow)?;
    let remainder = numerator % denominator;
    if remainder != 0 && ((remainder < 0) == (denominator < 0)) {
        quotient.checked_add(1).ok_or(MathError::Overflow)
    } else {
        Ok(quotient)
    }
}

pub fn checked_mul(a: i128, b: i128) -> Result<i128, MathError> {
    a.checked_mul(b).ok_or(MathError::Overflow)
}

pub fn checked_add(a: i128, b: i128) -> Result<i128, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}

pub fn checked_sub(a: i128, b: i128) -> Result<i128, MathError> {
    a.checked_sub(b).ok_or(MathError::Overflow)
}

pub fn to_signed(value: u128) -> Result<i128, MathError> {
    i128::try_from(value).map_err(|_| MathError::Overflow)
}

/// Clamps a signed figure at zero, e.g. a required-collateral floor.
pub fn non_negative(value: i128) -> Amount {
    if value > 0 {
        Amount::new(value.unsigned_abs())
    } else {
        Amount::zero()
    }
}

pub fn add_amounts(a: Amount, b: Amount) -> Result<Amount, MathError> {
    a.checked_add(b).ok_or(MathError::Overflow)
}
