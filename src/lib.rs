// composite-core: composite-asset lending and trigger engine.
// ledger-first architecture: one balance authority, wrappers and debt are ids.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, Bps, Timestamp, module accounts
//   2.x  asset_id.rs: packed 128-bit asset ids and type tags
//   3.x  ledger.rs: fungible balances and non-fungible ownership
//   4.x  oracle.rs: PriceSource trait, static router for tests/sim
//   5.x  tokenization/: type registry, wrapper books, recursive valuation
//   5.1  tokenization/erc20.rs: external token listings
//   5.2  tokenization/synthetic.rs: fungible and non-fungible baskets
//   5.3  tokenization/debt.rs: debt positions minted by lending
//   6.x  trigger.rs: trigger records and their state machine
//   7.x  lending.rs: per-asset pool claims accounting
//   8.x  auction.rs: liquidation auction book
//   9.x  events.rs: state transition events for audit
//   10.x protocol/: coordinator: lend, margin, keeper, auction entry points

// state modules
pub mod asset_id;
pub mod auction;
pub mod ledger;
pub mod lending;
pub mod tokenization;
pub mod trigger;
pub mod types;

// integration modules
pub mod config;
pub mod events;
pub mod oracle;
pub mod protocol;

// re exports for convenience
pub use asset_id::*;
pub use auction::*;
pub use events::*;
pub use ledger::*;
pub use lending::*;
pub use trigger::*;
pub use types::*;
pub use config::ProtocolConfig;
pub use oracle::{OracleRouter, PriceSource};
pub use protocol::{BorrowResult, CheckResult, PerformResult, Protocol, ProtocolError};
pub use tokenization::{
    BasketRecord, DebtBook, DebtRecord, NftBasketRecord, SyntheticFtBook, SyntheticNftBook,
    TokenBook, TokenInfo, Tokenization, TokenizationError, UnwrapPayload, WrapPayload,
    WrapperHandle,
};
