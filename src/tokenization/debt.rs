// 5.3: debt position book. a debt id is a non-fungible claim minted by the
// lending module: it links the borrower's locked collateral wrapper to the
// borrowed asset and principal, and carries the key of the trigger guarding
// the position. external wrap/unwrap on this tag is unsupported; the book is
// driven by borrow, repay and liquidation only.

use super::TokenizationError;
use crate::asset_id::{AssetId, DEBT_NFT_TAG};
use crate::ledger::Ledger;
use crate::trigger::TriggerKey;
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtRecord {
    /// Synthetic wrapper holding the locked collateral basket.
    pub collateral_id: AssetId,
    pub collateral_amount: u128,
    pub debt_asset: AssetId,
    pub principal: u128,
    pub opened_at: Timestamp,
    /// Liquidation trigger guarding this position.
    pub trigger_key: TriggerKey,
}

#[derive(Debug, Clone, Default)]
pub struct DebtBook {
    records: HashMap<AssetId, DebtRecord>,
    next_sequence: u32,
}

impl DebtBook {
    /// Reserve the next debt id. The sequence is consumed immediately so ids
    /// stay unique even when the enclosing borrow fails later.
    pub fn allocate(&mut self, creator: AccountId) -> Result<AssetId, TokenizationError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Ok(AssetId::pack(DEBT_NFT_TAG, sequence, creator)?)
    }

    /// Mint a previously allocated debt id to the borrower.
    pub fn mint(
        &mut self,
        ledger: &mut Ledger,
        owner: AccountId,
        id: AssetId,
        record: DebtRecord,
    ) -> Result<(), TokenizationError> {
        ledger.mint_non_fungible(owner, id)?;
        self.records.insert(id, record);
        Ok(())
    }

    /// Burn a settled or repaid debt id and drop its record.
    pub fn burn(&mut self, ledger: &mut Ledger, id: AssetId) -> Result<DebtRecord, TokenizationError> {
        let record = self
            .records
            .remove(&id)
            .ok_or(TokenizationError::UnknownRecord(id))?;
        ledger.burn_non_fungible(id)?;
        Ok(record)
    }

    pub fn get(&self, id: AssetId) -> Option<&DebtRecord> {
        self.records.get(&id)
    }
}
