// 4.0: price oracle boundary. the core is agnostic to where leaf prices come
// from; valuation only sees the PriceSource trait. OracleRouter is the static
// table used by tests and the simulation, standing in for a real feed.

use crate::asset_id::AssetId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Value of one base unit of an asset, in the protocol's quote scale.
pub trait PriceSource {
    fn price(&self, asset: AssetId) -> Option<u128>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleRouter {
    prices: HashMap<AssetId, u128>,
}

impl OracleRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_price(&mut self, asset: AssetId, price: u128) {
        self.prices.insert(asset, price);
    }

    pub fn clear_price(&mut self, asset: AssetId) {
        self.prices.remove(&asset);
    }
}

impl PriceSource for OracleRouter {
    fn price(&self, asset: AssetId) -> Option<u128> {
        self.prices.get(&asset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_id::TOKEN_TAG;
    use crate::types::AccountId;

    #[test]
    fn set_and_route() {
        let asset = AssetId::pack(TOKEN_TAG, 0, AccountId(0)).unwrap();
        let mut oracle = OracleRouter::new();
        assert_eq!(oracle.price(asset), None);

        oracle.set_price(asset, 2_000);
        assert_eq!(oracle.price(asset), Some(2_000));

        oracle.clear_price(asset);
        assert_eq!(oracle.price(asset), None);
    }
}
