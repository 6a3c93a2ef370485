// 7.0: lending pool bookkeeping. per-asset banks track each depositor's pool
// claim 1:1; the pooled tokens themselves sit in the ledger under the lending
// module account, so this is claims accounting, never a shadow balance.
// borrow/repay orchestration lives in the protocol layer, which also owns the
// tokenization and trigger state those flows touch.

use crate::asset_id::AssetId;
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LendingError {
    #[error("bank for {0} already registered")]
    BankAlreadyRegistered(AssetId),

    #[error("no bank for {0}")]
    UnknownBank(AssetId),

    #[error("insufficient pool balance of {asset}: requested {requested}, available {available}")]
    InsufficientPoolBalance {
        asset: AssetId,
        requested: u128,
        available: u128,
    },

    #[error("insufficient collateral: locked value {locked_value} against debt value {debt_value} at {min_ratio}")]
    InsufficientCollateral {
        locked_value: u128,
        debt_value: u128,
        min_ratio: crate::types::Bps,
    },

    #[error("{account} is not the owner of debt {debt_id}")]
    NotOwner {
        account: AccountId,
        debt_id: AssetId,
    },

    #[error("unknown debt {0}")]
    UnknownDebt(AssetId),

    #[error("pool balance overflow for {0}")]
    ArithmeticOverflow(AssetId),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bank {
    pub total_pooled: u128,
    claims: HashMap<AccountId, u128>,
}

impl Bank {
    pub fn claim_of(&self, account: AccountId) -> u128 {
        self.claims.get(&account).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Lending {
    banks: HashMap<AssetId, Bank>,
}

impl Lending {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bank(&mut self, asset: AssetId) -> Result<(), LendingError> {
        if self.banks.contains_key(&asset) {
            return Err(LendingError::BankAlreadyRegistered(asset));
        }
        self.banks.insert(asset, Bank::default());
        Ok(())
    }

    pub fn bank(&self, asset: AssetId) -> Result<&Bank, LendingError> {
        self.banks.get(&asset).ok_or(LendingError::UnknownBank(asset))
    }

    pub fn has_bank(&self, asset: AssetId) -> bool {
        self.banks.contains_key(&asset)
    }

    /// Depositor's redeemable pool claim.
    pub fn claim_of(&self, account: AccountId, asset: AssetId) -> u128 {
        self.banks
            .get(&asset)
            .map(|bank| bank.claim_of(account))
            .unwrap_or(0)
    }

    pub fn record_deposit(
        &mut self,
        account: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), LendingError> {
        let bank = self
            .banks
            .get_mut(&asset)
            .ok_or(LendingError::UnknownBank(asset))?;
        let claim = bank.claims.entry(account).or_insert(0);
        *claim = claim
            .checked_add(amount)
            .ok_or(LendingError::ArithmeticOverflow(asset))?;
        bank.total_pooled = bank
            .total_pooled
            .checked_add(amount)
            .ok_or(LendingError::ArithmeticOverflow(asset))?;
        Ok(())
    }

    pub fn record_withdraw(
        &mut self,
        account: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), LendingError> {
        let bank = self
            .banks
            .get_mut(&asset)
            .ok_or(LendingError::UnknownBank(asset))?;
        let claim = bank.claims.entry(account).or_insert(0);
        if amount > *claim {
            return Err(LendingError::InsufficientPoolBalance {
                asset,
                requested: amount,
                available: *claim,
            });
        }
        *claim -= amount;
        bank.total_pooled -= amount;
        Ok(())
    }
}
