// synth-maker: synthetic long/short token maker.
// collateral-first architecture: position bookkeeping gates every token move.
// all computation is deterministic integer fixed point with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, Side, Price, Amount, SignedAmount, EntryPrice
//   2.x  math.rs: checked mul/div with explicit rounding
//   4.x  position.rs: position struct, pnl, required collateral, mint/burn transitions
//   7.x  config.rs: collateral ratio, debit policy, env presets
//   8.x  engine/: maker facade: minting, burning, collateral, pricing, queries
//   8.2  shared.rs: lock-wrapped maker for threaded hosts
//   9.x  ledger.rs: fungible token ledger with owner-gated mint/burn
//   9.1  oracle.rs: single-writer reference price
//   11.x events.rs: state transition events for audit

pub mod config;
pub mod engine;
pub mod events;
pub mod ledger;
pub mod math;
pub mod oracle;
pub mod position;
pub mod shared;
pub mod types;

// re exports for convenience
pub use config::{CollateralPolicy, ConfigError, Environment, MakerConfig};
pub use engine::*;
pub use events::*;
pub use ledger::{LedgerError, LedgerEvent, TokenLedger};
pub use math::MathError;
pub use oracle::{OracleError, PriceOracle, PriceReport};
pub use position::*;
pub use shared::SharedMaker;
pub use types::*;
