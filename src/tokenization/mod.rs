// 5.0: type registry and wrapper dispatch. a type tag resolves through an
// explicit lookup table to one of the wrapper books; adding an asset type is a
// registration call, not a subclass. wrap debits underlying components from
// the caller, unwrap returns them, valuate recurses down to oracle leaf
// prices.

mod debt;
mod erc20;
mod synthetic;

pub use debt::{DebtBook, DebtRecord};
pub use erc20::{TokenBook, TokenInfo};
pub use synthetic::{BasketRecord, NftBasketRecord, SyntheticFtBook, SyntheticNftBook};

use crate::asset_id::{
    AssetId, CodecError, TypeTag, DEBT_NFT_TAG, SYNTHETIC_FT_TAG, SYNTHETIC_NFT_TAG, TOKEN_TAG,
};
use crate::ledger::{Ledger, LedgerError};
use crate::oracle::PriceSource;
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizationError {
    #[error("type {0} already registered")]
    AlreadyRegistered(TypeTag),

    #[error("type {0} is not registered")]
    UnknownType(TypeTag),

    #[error("wrap is not supported for {0}")]
    UnsupportedWrap(TypeTag),

    #[error("unwrap is not supported for {0}")]
    UnsupportedUnwrap(TypeTag),

    #[error("invalid payload: {0}")]
    InvalidArgument(String),

    #[error("no wrapper record for {0}")]
    UnknownRecord(AssetId),

    #[error("no oracle price for {0}")]
    MissingPrice(AssetId),

    #[error("value overflow valuating {0}")]
    ValueOverflow(AssetId),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Which wrapper book serves a type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapperHandle {
    /// Plain external fungible token. Valuation only; wrap/unwrap revert.
    Token,
    /// Fungible basket with a minted supply, partially unwrappable.
    SyntheticFungible,
    /// Owned basket, unwrapped whole.
    SyntheticNonFungible,
    /// Debt position. Minted only by the lending module.
    Debt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapPayload {
    /// Basket for a non-fungible wrap. Non-fungible components need amount 1.
    Basket {
        assets: Vec<AssetId>,
        amounts: Vec<u128>,
    },
    /// Basket for a fungible wrap, minting `supply` units of the new id.
    FungibleBasket {
        assets: Vec<AssetId>,
        amounts: Vec<u128>,
        supply: u128,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnwrapPayload {
    /// Burn the id and take the whole basket back.
    Whole,
    /// Burn `0 < units <= supply` and take the proportional share.
    Units(u128),
}

#[derive(Debug, Clone, Default)]
pub struct Tokenization {
    registry: BTreeMap<TypeTag, WrapperHandle>,
    pub tokens: TokenBook,
    pub synthetic_ft: SyntheticFtBook,
    pub synthetic_nft: SyntheticNftBook,
    pub debt: DebtBook,
}

impl Tokenization {
    /// Empty registry. Built-in tags are registered by the protocol
    /// constructor so tests can observe the registration path.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_types() -> Self {
        let mut tokenization = Self::new();
        tokenization.register_type(TOKEN_TAG, WrapperHandle::Token).expect("empty registry");
        tokenization
            .register_type(SYNTHETIC_FT_TAG, WrapperHandle::SyntheticFungible)
            .expect("empty registry");
        tokenization
            .register_type(SYNTHETIC_NFT_TAG, WrapperHandle::SyntheticNonFungible)
            .expect("empty registry");
        tokenization.register_type(DEBT_NFT_TAG, WrapperHandle::Debt).expect("empty registry");
        tokenization
    }

    pub fn register_type(
        &mut self,
        tag: TypeTag,
        handle: WrapperHandle,
    ) -> Result<(), TokenizationError> {
        if self.registry.contains_key(&tag) {
            return Err(TokenizationError::AlreadyRegistered(tag));
        }
        self.registry.insert(tag, handle);
        Ok(())
    }

    pub fn handle(&self, tag: TypeTag) -> Result<WrapperHandle, TokenizationError> {
        self.registry
            .get(&tag)
            .copied()
            .ok_or(TokenizationError::UnknownType(tag))
    }

    /// Dispatch a wrap to the book registered for `tag`. Returns the new id.
    pub fn wrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        tag: TypeTag,
        payload: WrapPayload,
    ) -> Result<AssetId, TokenizationError> {
        match self.handle(tag)? {
            WrapperHandle::SyntheticFungible => match payload {
                WrapPayload::FungibleBasket {
                    assets,
                    amounts,
                    supply,
                } => self.synthetic_ft.wrap(ledger, caller, &assets, &amounts, supply),
                WrapPayload::Basket { .. } => Err(TokenizationError::InvalidArgument(
                    "fungible wrap needs a supply".into(),
                )),
            },
            WrapperHandle::SyntheticNonFungible => match payload {
                WrapPayload::Basket { assets, amounts } => {
                    self.synthetic_nft.wrap(ledger, caller, &assets, &amounts)
                }
                WrapPayload::FungibleBasket { .. } => Err(TokenizationError::InvalidArgument(
                    "non-fungible wrap takes no supply".into(),
                )),
            },
            WrapperHandle::Token | WrapperHandle::Debt => {
                Err(TokenizationError::UnsupportedWrap(tag))
            }
        }
    }

    /// Dispatch an unwrap by decoding the id's tag. Returns the components
    /// handed back to the caller.
    pub fn unwrap(
        &mut self,
        ledger: &mut Ledger,
        caller: AccountId,
        id: AssetId,
        payload: UnwrapPayload,
    ) -> Result<Vec<(AssetId, u128)>, TokenizationError> {
        let tag = id.tag();
        match self.handle(tag)? {
            WrapperHandle::SyntheticFungible => {
                let units = match payload {
                    UnwrapPayload::Units(units) => units,
                    UnwrapPayload::Whole => self
                        .synthetic_ft
                        .supply_of(id)
                        .ok_or(TokenizationError::UnknownRecord(id))?,
                };
                self.synthetic_ft.unwrap(ledger, caller, id, units)
            }
            WrapperHandle::SyntheticNonFungible => match payload {
                UnwrapPayload::Whole => self.synthetic_nft.unwrap(ledger, caller, id),
                UnwrapPayload::Units(_) => Err(TokenizationError::InvalidArgument(
                    "non-fungible unwrap is all-or-nothing".into(),
                )),
            },
            WrapperHandle::Token | WrapperHandle::Debt => {
                Err(TokenizationError::UnsupportedUnwrap(tag))
            }
        }
    }

    /// Price-weighted unit value of `amount` of `id`, recursing through
    /// basket components down to oracle leaf prices. Monotonic in `amount`
    /// and unchanged by a wrap followed by a full unwrap.
    pub fn valuate(
        &self,
        oracle: &dyn PriceSource,
        id: AssetId,
        amount: u128,
    ) -> Result<u128, TokenizationError> {
        match self.handle(id.tag())? {
            WrapperHandle::Token => {
                if !self.tokens.is_listed(id) {
                    return Err(TokenizationError::UnknownRecord(id));
                }
                let price = oracle
                    .price(id)
                    .ok_or(TokenizationError::MissingPrice(id))?;
                price
                    .checked_mul(amount)
                    .ok_or(TokenizationError::ValueOverflow(id))
            }
            WrapperHandle::SyntheticFungible => {
                let Some(record) = self.synthetic_ft.get(id) else {
                    // fully unwrapped baskets are worth nothing
                    return Ok(0);
                };
                let basket = self.valuate_basket(oracle, id, &record.components)?;
                // share of the basket proportional to the units held
                basket
                    .checked_mul(amount)
                    .ok_or(TokenizationError::ValueOverflow(id))
                    .map(|scaled| scaled / record.supply)
            }
            WrapperHandle::SyntheticNonFungible => {
                if amount == 0 {
                    return Ok(0);
                }
                match self.synthetic_nft.get(id) {
                    Some(record) => self.valuate_basket(oracle, id, &record.components),
                    None => Ok(0),
                }
            }
            WrapperHandle::Debt => {
                if amount == 0 {
                    return Ok(0);
                }
                let record = self
                    .debt
                    .get(id)
                    .ok_or(TokenizationError::UnknownRecord(id))?;
                let collateral =
                    self.valuate(oracle, record.collateral_id, record.collateral_amount)?;
                let owed = self.valuate(oracle, record.debt_asset, record.principal)?;
                // net equity of the position, floored at zero
                Ok(collateral.saturating_sub(owed))
            }
        }
    }

    fn valuate_basket(
        &self,
        oracle: &dyn PriceSource,
        id: AssetId,
        components: &[(AssetId, u128)],
    ) -> Result<u128, TokenizationError> {
        let mut total: u128 = 0;
        for (asset, amount) in components {
            let value = self.valuate(oracle, *asset, *amount)?;
            total = total
                .checked_add(value)
                .ok_or(TokenizationError::ValueOverflow(id))?;
        }
        Ok(total)
    }
}
