// 5.1: external token book. plain fungible tokens enter the system by being
// listed here, which assigns them a composite id under the token tag. wrap and
// unwrap are meaningless for a leaf token; only valuation applies.

use super::TokenizationError;
use crate::asset_id::{AssetId, TOKEN_TAG};
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TokenBook {
    tokens: HashMap<AssetId, TokenInfo>,
    next_sequence: u32,
}

impl TokenBook {
    /// List an external token and assign its id. Listed tokens are created by
    /// the system account; their sequence is the listing order.
    pub fn list(&mut self, symbol: &str, decimals: u32) -> Result<AssetId, TokenizationError> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let id = AssetId::pack(TOKEN_TAG, sequence, AccountId(0))?;
        self.tokens.insert(
            id,
            TokenInfo {
                symbol: symbol.to_string(),
                decimals,
            },
        );
        Ok(id)
    }

    pub fn is_listed(&self, id: AssetId) -> bool {
        self.tokens.contains_key(&id)
    }

    pub fn info(&self, id: AssetId) -> Option<&TokenInfo> {
        self.tokens.get(&id)
    }
}
