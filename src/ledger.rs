// 3.0: the asset ledger. single authoritative store for fungible balances and
// non-fungible ownership. every other module routes mutations through here and
// keeps only identifiers, never a shadow balance.

use crate::asset_id::AssetId;
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient balance of {asset} for {account}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        asset: AssetId,
        requested: u128,
        available: u128,
    },

    #[error("duplicate identifier {0}")]
    DuplicateIdentifier(AssetId),

    #[error("{account} is not the owner of {asset}")]
    NotOwner { account: AccountId, asset: AssetId },

    #[error("{0} was already burned")]
    AlreadyBurned(AssetId),

    #[error("{0} was never minted")]
    UnknownIdentifier(AssetId),

    #[error("balance overflow crediting {asset} to {account}")]
    ArithmeticOverflow { account: AccountId, asset: AssetId },

    #[error("{0} is non-fungible and has no balance entry")]
    NotFungible(AssetId),
}

/// Balance and ownership store. Burned non-fungible ids stay in the map as
/// `None`, so a retired key can never be minted again under a new owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    fungible: HashMap<(AccountId, AssetId), u128>,
    owners: HashMap<AssetId, Option<AccountId>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> u128 {
        self.fungible.get(&(account, asset)).copied().unwrap_or(0)
    }

    /// Current owner, or None if the id was burned or never minted.
    pub fn owner_of(&self, asset: AssetId) -> Option<AccountId> {
        self.owners.get(&asset).copied().flatten()
    }

    pub fn credit(
        &mut self,
        account: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if asset.is_non_fungible() {
            return Err(LedgerError::NotFungible(asset));
        }
        let slot = self.fungible.entry((account, asset)).or_insert(0);
        *slot = slot
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow { account, asset })?;
        Ok(())
    }

    pub fn debit(
        &mut self,
        account: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        if asset.is_non_fungible() {
            return Err(LedgerError::NotFungible(asset));
        }
        let available = self.balance_of(account, asset);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                account,
                asset,
                requested: amount,
                available,
            });
        }
        self.fungible.insert((account, asset), available - amount);
        Ok(())
    }

    /// Debit + credit in one step. Fails before any mutation.
    pub fn transfer(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), LedgerError> {
        // validate the credit side first so a debit is never left dangling
        let to_balance = self.balance_of(to, asset);
        if to_balance.checked_add(amount).is_none() {
            return Err(LedgerError::ArithmeticOverflow { account: to, asset });
        }
        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)
    }

    pub fn mint_non_fungible(&mut self, owner: AccountId, asset: AssetId) -> Result<(), LedgerError> {
        if self.owners.contains_key(&asset) {
            // includes burned ids: keys are retired, not recycled
            return Err(LedgerError::DuplicateIdentifier(asset));
        }
        self.owners.insert(asset, Some(owner));
        Ok(())
    }

    pub fn transfer_non_fungible(
        &mut self,
        asset: AssetId,
        from: AccountId,
        to: AccountId,
    ) -> Result<(), LedgerError> {
        match self.owners.get(&asset) {
            None => Err(LedgerError::UnknownIdentifier(asset)),
            Some(None) => Err(LedgerError::AlreadyBurned(asset)),
            Some(Some(owner)) if *owner != from => Err(LedgerError::NotOwner {
                account: from,
                asset,
            }),
            Some(Some(_)) => {
                self.owners.insert(asset, Some(to));
                Ok(())
            }
        }
    }

    /// Clear ownership. The key stays in the map so the id cannot be reminted.
    pub fn burn_non_fungible(&mut self, asset: AssetId) -> Result<AccountId, LedgerError> {
        match self.owners.get(&asset) {
            None => Err(LedgerError::UnknownIdentifier(asset)),
            Some(None) => Err(LedgerError::AlreadyBurned(asset)),
            Some(Some(owner)) => {
                let owner = *owner;
                self.owners.insert(asset, None);
                Ok(owner)
            }
        }
    }
}
