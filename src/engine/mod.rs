// 8.0: maker facade. the only entry point callers use: validates intent,
// moves tokens through the ledgers, and delegates bookkeeping to position.rs.
// every mutating call is all-or-nothing.

mod burning;
mod collateral;
mod config;
mod core;
mod minting;
mod pricing;
mod queries;
mod results;

pub use config::EngineConfig;
pub use self::core::{Maker, MakerAssets};
pub use results::{BurnResult, MakerError, MintResult, RedeemResult};
