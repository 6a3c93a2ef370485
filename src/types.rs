// 1.0: primitives shared by every module. accounts, basis points, timestamps.
// each is a newtype so the compiler catches type mixups.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account-{}", self.0)
    }
}

// 1.1: reserved module accounts. the ledger is the single balance authority, so
// escrow held by a subsystem lives under that subsystem's own account instead
// of a shadow balance inside the subsystem.
pub mod module {
    use super::AccountId;

    pub const SYNTHETIC_FT: AccountId = AccountId(1);
    pub const SYNTHETIC_NFT: AccountId = AccountId(2);
    pub const LENDING: AccountId = AccountId(3);
    pub const AUCTION: AccountId = AccountId(4);

    /// User accounts are allocated from here up.
    pub const FIRST_USER: u64 = 10;
}

// 1.2: basis points. 100 bps = 1%. ratio checks are done in integer math:
// lhs * 10000 compared against rhs * bps, no division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Bps(pub u32);

pub const BPS_SCALE: u128 = 10_000;

impl Bps {
    pub fn value(&self) -> u128 {
        self.0 as u128
    }
}

impl fmt::Display for Bps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

// 1.3: millisecond timestamp. logical time, advanced by the host.
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

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
