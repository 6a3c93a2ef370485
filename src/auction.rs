// 8.0: liquidation auction book. one auction per debt id, opened lazily by the
// first bid (keepers may bid ahead of the trigger firing) and closed by the
// trigger execution that settles the debt. only the highest bid is ever held
// in escrow: a displaced bidder is refunded inside the displacing bid call.

use crate::asset_id::AssetId;
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuctionError {
    #[error("bid {bid} on {debt_id} does not beat {highest}")]
    BidTooLow {
        debt_id: AssetId,
        bid: u128,
        highest: u128,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Auction {
    pub debt_id: AssetId,
    /// Denomination of bids: the debt's borrowed asset.
    pub bid_asset: AssetId,
    pub highest_bid: u128,
    pub highest_bidder: AccountId,
    pub opened_at: Timestamp,
}

#[derive(Debug, Clone, Default)]
pub struct AuctionBook {
    auctions: HashMap<AssetId, Auction>,
}

impl AuctionBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, debt_id: AssetId) -> Option<&Auction> {
        self.auctions.get(&debt_id)
    }

    /// Record a bid. Returns the displaced (bidder, amount) to refund, if any.
    /// The caller moves the escrow; this book only tracks the standing bid.
    pub fn place_bid(
        &mut self,
        debt_id: AssetId,
        bid_asset: AssetId,
        bidder: AccountId,
        amount: u128,
        now: Timestamp,
    ) -> Result<Option<(AccountId, u128)>, AuctionError> {
        match self.auctions.get_mut(&debt_id) {
            Some(auction) => {
                if amount <= auction.highest_bid {
                    return Err(AuctionError::BidTooLow {
                        debt_id,
                        bid: amount,
                        highest: auction.highest_bid,
                    });
                }
                let displaced = (auction.highest_bidder, auction.highest_bid);
                auction.highest_bid = amount;
                auction.highest_bidder = bidder;
                Ok(Some(displaced))
            }
            None => {
                if amount == 0 {
                    return Err(AuctionError::BidTooLow {
                        debt_id,
                        bid: 0,
                        highest: 0,
                    });
                }
                self.auctions.insert(
                    debt_id,
                    Auction {
                        debt_id,
                        bid_asset,
                        highest_bid: amount,
                        highest_bidder: bidder,
                        opened_at: now,
                    },
                );
                Ok(None)
            }
        }
    }

    /// Remove the auction at settlement. None means nobody bid.
    pub fn close(&mut self, debt_id: AssetId) -> Option<Auction> {
        self.auctions.remove(&debt_id)
    }
}
