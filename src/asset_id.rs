// 2.0: composite asset identifiers. one u128 key packs a type tag, a per-type
// sequence number and the creator account. pack/unpack are exact inverses for
// every value inside the declared bit widths, and two distinct triples can
// never collide because the fields occupy disjoint bit ranges.
//
// layout (low to high):
//   bits   0..64   creator account
//   bits  64..96   sequence number (monotonic per type tag, never reused)
//   bits  96..120  type tag
//   bits 120..128  zero

use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CREATOR_BITS: u32 = 64;
pub const SEQUENCE_BITS: u32 = 32;
pub const TAG_BITS: u32 = 24;

const SEQUENCE_SHIFT: u32 = CREATOR_BITS;
const TAG_SHIFT: u32 = CREATOR_BITS + SEQUENCE_BITS;

// 2.1: type tag structure. bit 23 flags non-fungible ownership semantics,
// bits 16..23 hold the category, bits 0..16 the subtype within it.
pub const NFT_FLAG: u32 = 1 << 23;
const CATEGORY_SHIFT: u32 = 16;
const SUBTYPE_MASK: u32 = (1 << CATEGORY_SHIFT) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeTag(pub u32);

impl TypeTag {
    pub const fn new(category: u32, subtype: u32, non_fungible: bool) -> Self {
        let flag = if non_fungible { NFT_FLAG } else { 0 };
        Self((category << CATEGORY_SHIFT) | (subtype & SUBTYPE_MASK) | flag)
    }

    pub fn is_non_fungible(&self) -> bool {
        self.0 & NFT_FLAG != 0
    }

    pub fn category(&self) -> u32 {
        (self.0 & !NFT_FLAG) >> CATEGORY_SHIFT
    }

    pub fn subtype(&self) -> u32 {
        self.0 & SUBTYPE_MASK
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tag-{:#08x}", self.0)
    }
}

// built-in tags. plain external tokens are tag 0, synthetic baskets live in
// category 2, debt positions in category 3, non-fungible variants carry the
// flag bit.
pub const TOKEN_TAG: TypeTag = TypeTag::new(0, 0, false);
pub const SYNTHETIC_FT_TAG: TypeTag = TypeTag::new(2, 3, false);
pub const SYNTHETIC_NFT_TAG: TypeTag = TypeTag::new(2, 4, true);
pub const DEBT_NFT_TAG: TypeTag = TypeTag::new(3, 2, true);

/// Packing failure: a field exceeds its allotted bit width.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("field {field} value {value} exceeds {width} bits")]
    RangeError {
        field: &'static str,
        value: u128,
        width: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u128);

impl AssetId {
    /// Pack (tag, sequence, creator) into a single key. Total and
    /// deterministic; fails only when a field is out of range.
    pub fn pack(tag: TypeTag, sequence: u32, creator: AccountId) -> Result<Self, CodecError> {
        if tag.0 >= 1 << TAG_BITS {
            return Err(CodecError::RangeError {
                field: "type_tag",
                value: tag.0 as u128,
                width: TAG_BITS,
            });
        }
        let id = ((tag.0 as u128) << TAG_SHIFT)
            | ((sequence as u128) << SEQUENCE_SHIFT)
            | creator.0 as u128;
        Ok(Self(id))
    }

    /// Recover the packed triple exactly.
    pub fn unpack(&self) -> (TypeTag, u32, AccountId) {
        (self.tag(), self.sequence(), self.creator())
    }

    pub fn tag(&self) -> TypeTag {
        TypeTag((self.0 >> TAG_SHIFT) as u32 & ((1 << TAG_BITS) - 1))
    }

    pub fn sequence(&self) -> u32 {
        (self.0 >> SEQUENCE_SHIFT) as u32
    }

    pub fn creator(&self) -> AccountId {
        AccountId(self.0 as u64)
    }

    pub fn is_non_fungible(&self) -> bool {
        self.tag().is_non_fungible()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset-{:#x}", self.0)
    }
}
