//! Price update operations.

use super::core::Maker;
use super::results::MakerError;
use crate::events::{EventPayload, Operation, PriceUpdatedEvent};
use crate::oracle::PriceReport;
use crate::types::{AccountId, Price};

impl Maker {
    /// Replace the reference price. Takes effect for every later read,
    /// including the very next mint or burn.
    pub fn set_price(&mut self, caller: AccountId, raw_price: u128) -> Result<PriceReport, MakerError> {
        self.atomically(caller, Operation::SetPrice, |maker, events| {
            let now = maker.current_time;
            let report = maker.state.oracle.set_price(caller, raw_price, now)?;

            tracing::info!(previous = %report.previous, price = %report.price, "reference price updated");
            events.push(EventPayload::PriceUpdated(PriceUpdatedEvent {
                previous: report.previous,
                price: report.price,
            }));

            Ok(report)
        })
    }

    /// Current reference price, `Price::ZERO` until first set.
    pub fn get_price(&self) -> Price {
        self.state.oracle.reference_price()
    }
}
