// 9.1 oracle.rs: single-writer reference price. one authorized price setter
// writes it, everyone reads it. no history: a new report replaces the old one
// outright.

use crate::types::{AccountId, Price, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("{caller} is not the price setter")]
    Unauthorized { caller: AccountId },

    #[error("Price must be positive")]
    InvalidPrice,

    #[error("Reference price has not been set")]
    PriceNotSet,
}

/// A committed price report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceReport {
    pub previous: Price,
    pub price: Price,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceOracle {
    price_setter: AccountId,
    reference_price: Price,
    updated_at: Option<Timestamp>,
    update_count: u64,
}

impl PriceOracle {
    pub fn new(price_setter: AccountId) -> Self {
        Self {
            price_setter,
            reference_price: Price::ZERO,
            updated_at: None,
            update_count: 0,
        }
    }

    pub fn price_setter(&self) -> AccountId {
        self.price_setter
    }

    /// Replaces the reference price. Only the price setter may call this.
    pub fn set_price(
        &mut self,
        caller: AccountId,
        raw_price: u128,
        timestamp: Timestamp,
    ) -> Result<PriceReport, OracleError> {
        if caller != self.price_setter {
            return Err(OracleError::Unauthorized { caller });
        }
        let price = Price::new(raw_price).ok_or(OracleError::InvalidPrice)?;

        let previous = self.reference_price;
        self.reference_price = price;
        self.updated_at = Some(timestamp);
        self.update_count += 1;

        Ok(PriceReport {
            previous,
            price,
            timestamp,
        })
    }

    /// Current reference price, `Price::ZERO` before the first report.
    pub fn reference_price(&self) -> Price {
        self.reference_price
    }

    pub fn price(&self) -> Option<Price> {
        Price::new(self.reference_price.raw())
    }

    pub fn require_price(&self) -> Result<Price, OracleError> {
        self.price().ok_or(OracleError::PriceNotSet)
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
