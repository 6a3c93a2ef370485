// 5.2: synthetic baskets. a wrap pulls the underlying components into the
// book's escrow account and mints one new id for the bundle; unwrap reverses
// it. the fungible book mints a divisible supply and supports proportional
// partial unwraps, the non-fungible book mints a single owned token and
// unwraps whole. sequence numbers are taken eagerly so a failed wrap still
// consumes its number and ids are never reissued.

use super::TokenizationError;
use crate::asset_id::{AssetId, DEBT_NFT_TAG, SYNTHETIC_FT_TAG, SYNTHETIC_NFT_TAG};
use crate::ledger::{Ledger, LedgerError};
use crate::types::{module, AccountId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fungible basket: component list plus the outstanding supply of the
/// wrapper id. Component amounts shrink proportionally on partial unwrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketRecord {
    pub components: Vec<(AssetId, u128)>,
    pub supply: u128,
}

/// Non-fungible basket: component list only; ownership lives in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NftBasketRecord {
    pub components: Vec<(AssetId, u128)>,
}

fn validate_shape(assets: &[AssetId], amounts: &[u128]) -> Result<(), TokenizationError> {
    if assets.is_empty() {
        return Err(TokenizationError::InvalidArgument("empty basket".into()));
    }
    if assets.len() != amounts.len() {
        return Err(TokenizationError::InvalidArgument(
            "assets and amounts differ in length".into(),
        ));
    }
    if amounts.contains(&0) {
        return Err(TokenizationError::InvalidArgument(
            "zero-amount component".into(),
        ));
    }
    Ok(())
}

/// Check the caller can fund every component before anything moves, so a
/// failing wrap leaves no partial transfer behind. Fungible holdings are
/// summed per asset to handle repeated components. Debt positions are never
/// accepted: settlement burns them wherever they sit, which would leave the
/// basket holding a dead component it cannot release.
fn validate_funding(
    ledger: &Ledger,
    caller: AccountId,
    assets: &[AssetId],
    amounts: &[u128],
    allow_non_fungible: bool,
) -> Result<(), TokenizationError> {
    let mut fungible_totals: HashMap<AssetId, u128> = HashMap::new();
    let mut seen_nfts: Vec<AssetId> = Vec::new();

    for (asset, amount) in assets.iter().zip(amounts) {
        if asset.is_non_fungible() {
            if !allow_non_fungible {
                return Err(TokenizationError::InvalidArgument(
                    "non-fungible component in a divisible basket".into(),
                ));
            }
            if *amount != 1 {
                return Err(TokenizationError::InvalidArgument(
                    "non-fungible component amount must be 1".into(),
                ));
            }
            if asset.tag() == DEBT_NFT_TAG {
                return Err(TokenizationError::InvalidArgument(
                    "debt position as a basket component".into(),
                ));
            }
            if seen_nfts.contains(asset) {
                return Err(TokenizationError::InvalidArgument(
                    "repeated non-fungible component".into(),
                ));
            }
            if ledger.owner_of(*asset) != Some(caller) {
                return Err(LedgerError::NotOwner {
                    account: caller,
                    asset: *asset,
                }
                .into());
            }
            seen_nfts.push(*asset);
        } else {
            let total = fungible_totals.entry(*asset).or_insert(0);
            *total = total
                .checked_add(*amount)
                .ok_or(TokenizationError::ValueOverflow(*asset))?;
        }
    }

    for (asset, total) in fungible_totals {
        let available = ledger.balance_of(caller, asset);
        if total > available {
            return Err(LedgerError::InsufficientBalance {
                account: caller,
                asset,
                requested: total,
                available,
            }
            .into());
        }
    }
    Ok(())
}

fn move_components_in(
    ledger: &mut Ledger,
    caller: AccountId,
    escrow: AccountId,
    assets: &[AssetId],
    amounts: &[u128],
) -> Result<(), TokenizationError> {
    for (asset, amount) in assets.iter().zip(amounts) {
        if asset.is_non_fungible() {
            ledger.transfer_non_fungible(*asset, caller, escrow)?;
        } else {
            ledger.transfer(*asset, caller, escrow, *amount)?;
        }
    }
    Ok(())
}

fn move_components_out(
    ledger: &mut Ledger,
    escrow: AccountId,
    caller: AccountId,
    components: &[(AssetId, u128)],
) -> Result<(), TokenizationError> {
    for (asset, amount) in components {
        if asset.is_non_fungible() {
            ledger.transfer_non_fungible(*asset, escrow, caller)?;
        } else {
            ledger.transfer(*asset, escrow, caller, *amount)?;
        }
    }
    Ok(())
}

// 5.2.1: fungible basket book.
#[derive(Debug, Clone, Default)]
pub struct SyntheticFtBook {
    records: HashMap<AssetId, BasketRecord>,
    next_sequence: u32,
}

impl SyntheticFtBook {
    fn allocate(&mut self, creator: AccountId) -> Result<AssetId, TokenizationError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Ok(AssetId::pack(SYNTHETIC_FT_TAG, sequence, creator)?)
    }

    pub fn wrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        assets: &[AssetId],
        amounts: &[u128],
        supply: u128,
    ) -> Result<AssetId, TokenizationError> {
        // sequence is consumed even if validation fails below
        let id = self.allocate(caller)?;

        if supply == 0 {
            return Err(TokenizationError::InvalidArgument("zero supply".into()));
        }
        validate_shape(assets, amounts)?;
        validate_funding(ledger, caller, assets, amounts, false)?;

        move_components_in(ledger, caller, module::SYNTHETIC_FT, assets, amounts)?;
        ledger.credit(caller, id, supply)?;

        self.records.insert(
            id,
            BasketRecord {
                components: assets.iter().copied().zip(amounts.iter().copied()).collect(),
                supply,
            },
        );
        Ok(id)
    }

    /// Burn `units` of the wrapper and return the proportional share of each
    /// component. Burning the last unit destroys the record.
    pub fn unwrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        id: AssetId,
        units: u128,
    ) -> Result<Vec<(AssetId, u128)>, TokenizationError> {
        let record = self
            .records
            .get(&id)
            .ok_or(TokenizationError::UnknownRecord(id))?;
        if units == 0 || units > record.supply {
            return Err(TokenizationError::InvalidArgument(format!(
                "unwrap of {units} units against supply {}",
                record.supply
            )));
        }

        let supply = record.supply;
        let mut returned = Vec::with_capacity(record.components.len());
        for (asset, amount) in &record.components {
            let share = amount
                .checked_mul(units)
                .ok_or(TokenizationError::ValueOverflow(*asset))?
                / supply;
            returned.push((*asset, share));
        }

        // burn the wrapper units, then release escrow
        ledger.debit(caller, id, units)?;
        move_components_out(ledger, module::SYNTHETIC_FT, caller, &returned)?;

        let record = self.records.get_mut(&id).expect("checked above");
        record.supply -= units;
        for ((_, amount), (_, share)) in record.components.iter_mut().zip(&returned) {
            *amount -= share;
        }
        if record.supply == 0 {
            self.records.remove(&id);
        }
        Ok(returned)
    }

    pub fn get(&self, id: AssetId) -> Option<&BasketRecord> {
        self.records.get(&id)
    }

    pub fn supply_of(&self, id: AssetId) -> Option<u128> {
        self.records.get(&id).map(|record| record.supply)
    }
}

// 5.2.2: non-fungible basket book. components may themselves be non-fungible
// (nested baskets), which the leveraged flows rely on.
#[derive(Debug, Clone, Default)]
pub struct SyntheticNftBook {
    records: HashMap<AssetId, NftBasketRecord>,
    next_sequence: u32,
}

impl SyntheticNftBook {
    fn allocate(&mut self, creator: AccountId) -> Result<AssetId, TokenizationError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        Ok(AssetId::pack(SYNTHETIC_NFT_TAG, sequence, creator)?)
    }

    pub fn wrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        assets: &[AssetId],
        amounts: &[u128],
    ) -> Result<AssetId, TokenizationError> {
        let id = self.allocate(caller)?;

        validate_shape(assets, amounts)?;
        validate_funding(ledger, caller, assets, amounts, true)?;

        move_components_in(ledger, caller, module::SYNTHETIC_NFT, assets, amounts)?;
        ledger.mint_non_fungible(caller, id)?;

        self.records.insert(
            id,
            NftBasketRecord {
                components: assets.iter().copied().zip(amounts.iter().copied()).collect(),
            },
        );
        Ok(id)
    }

    /// Burn the wrapper and return the whole basket to its owner.
    pub fn unwrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        id: AssetId,
    ) -> Result<Vec<(AssetId, u128)>, TokenizationError> {
        if !self.records.contains_key(&id) {
            return Err(TokenizationError::UnknownRecord(id));
        }
        if ledger.owner_of(id) != Some(caller) {
            return Err(LedgerError::NotOwner {
                account: caller,
                asset: id,
            }
            .into());
        }

        ledger.burn_non_fungible(id)?;
        let record = self.records.remove(&id).expect("checked above");
        move_components_out(ledger, module::SYNTHETIC_NFT, caller, &record.components)?;
        Ok(record.components)
    }

    pub fn get(&self, id: AssetId) -> Option<&NftBasketRecord> {
        self.records.get(&id)
    }
}
