// 10.0.2: result types and the aggregate error for protocol operations.

use crate::asset_id::{AssetId, CodecError};
use crate::auction::AuctionError;
use crate::ledger::LedgerError;
use crate::lending::LendingError;
use crate::tokenization::TokenizationError;
use crate::trigger::{PerformPayload, TriggerError, TriggerKey};
use crate::types::AccountId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowResult {
    pub debt_id: AssetId,
    pub collateral_id: AssetId,
    pub trigger_key: TriggerKey,
}

/// Outcome of a check cycle. `payload` is present exactly when `ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub ready: bool,
    pub payload: Option<PerformPayload>,
}

impl CheckResult {
    pub fn nothing_ready() -> Self {
        Self {
            ready: false,
            payload: None,
        }
    }
}

/// Outcome of a perform call. `executed` is None when the proof was stale
/// (already executed, cancelled, or no longer ready) and nothing happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformResult {
    pub executed: Option<TriggerKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("tokenization error: {0}")]
    Tokenization(#[from] TokenizationError),

    #[error("lending error: {0}")]
    Lending(#[from] LendingError),

    #[error("trigger error: {0}")]
    Trigger(#[from] TriggerError),

    #[error("auction error: {0}")]
    Auction(#[from] AuctionError),
}
