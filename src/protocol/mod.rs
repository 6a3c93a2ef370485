// 10.0: protocol coordinator. owns the ledger and every subsystem, and exposes
// the external entry points. deterministic and event-driven with no external
// I/O; every entry point validates before mutating so an error implies no
// observable state change.

mod auction_ops;
mod core;
mod keeper;
mod lend;
mod margin_ops;
mod results;
mod tokenize;

pub use self::core::Protocol;
pub use self::results::{BorrowResult, CheckResult, PerformResult, ProtocolError};
