// 8.0.2: result types and errors for maker operations.

use crate::config::ConfigError;
use crate::ledger::LedgerError;
use crate::math::MathError;
use crate::oracle::OracleError;
use crate::position::{Position, PositionError};
use crate::types::{AccountId, Amount, Price, Side, SignedAmount};

#[derive(Debug, Clone)]
pub struct MintResult {
    pub account_id: AccountId,
    pub side: Side,
    pub amount: Amount,
    pub price: Price,
    pub collateral_debit: Amount,
    pub realized_pnl: SignedAmount,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct BurnResult {
    pub account_id: AccountId,
    pub side: Side,
    pub amount: Amount,
    pub realized_pnl: SignedAmount,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct RedeemResult {
    pub account_id: AccountId,
    pub amount: Amount,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MakerError {
    #[error("{caller} is not authorized to {action}")]
    Unauthorized { caller: AccountId, action: &'static str },

    #[error("Invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("Reference price has not been set")]
    PriceNotSet,

    #[error("Insufficient {side} balance: requested {requested}, available {available}")]
    InsufficientBalance {
        side: Side,
        requested: Amount,
        available: Amount,
    },

    #[error("Insufficient collateral: requested {requested}, redeemable {redeemable}")]
    InsufficientCollateral { requested: Amount, redeemable: Amount },

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<OracleError> for MakerError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::Unauthorized { caller } => MakerError::Unauthorized {
                caller,
                action: "set the price",
            },
            OracleError::InvalidPrice => MakerError::InvalidInput("price must be positive"),
            OracleError::PriceNotSet => MakerError::PriceNotSet,
        }
    }
}

impl From<PositionError> for MakerError {
    fn from(err: PositionError) -> Self {
        match err {
            PositionError::InsufficientBalance {
                side,
                requested,
                available,
            } => MakerError::InsufficientBalance {
                side,
                requested,
                available,
            },
            PositionError::Math(math) => MakerError::Math(math),
        }
    }
}
