// 10.5: liquidation auction entry points. bids escrow the full amount under
// the auction module account and refund the displaced bidder in the same call,
// so at most one bid is ever held per auction. settlement runs inside the
// liquidation trigger's perform and consumes the standing bid, if any.

use crate::asset_id::AssetId;
use crate::events::{AuctionSettledEvent, BidPlacedEvent, EventPayload};
use crate::ledger::LedgerError;
use crate::lending::LendingError;
use crate::types::{module, AccountId};

use super::core::Protocol;
use super::results::ProtocolError;

impl Protocol {
    /// Bid on a live debt position, denominated in the position's borrowed
    /// asset. The first bid opens the auction; later bids must strictly beat
    /// the standing one and displace it with an in-call refund.
    pub fn bid(
        &mut self,
        caller: AccountId,
        debt_id: AssetId,
        amount: u128,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(caller)?;
        let bid_asset = self
            .tokenization
            .debt
            .get(debt_id)
            .map(|record| record.debt_asset)
            .ok_or(LendingError::UnknownDebt(debt_id))?;

        let available = self.ledger.balance_of(caller, bid_asset);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                account: caller,
                asset: bid_asset,
                requested: amount,
                available,
            }
            .into());
        }

        let now = self.time();
        let displaced = self
            .auction
            .place_bid(debt_id, bid_asset, caller, amount, now)?;
        self.ledger
            .transfer(bid_asset, caller, module::AUCTION, amount)?;
        if let Some((bidder, refund)) = displaced {
            self.ledger
                .transfer(bid_asset, module::AUCTION, bidder, refund)?;
        }

        self.emit(EventPayload::BidPlaced(BidPlacedEvent {
            debt_id,
            bidder: caller,
            amount,
            refunded: displaced,
        }));
        Ok(())
    }

    /// Settle a liquidated debt. With a standing bid the winner takes the
    /// collateral wrapper, the pool recovers up to the principal and any
    /// surplus goes to the borrower. With no bid the wrapper reverts to the
    /// borrower whole and the pool absorbs the loss.
    pub(super) fn settle_liquidation(&mut self, debt_id: AssetId) -> Result<(), ProtocolError> {
        let borrower = self
            .ledger
            .owner_of(debt_id)
            .ok_or(LendingError::UnknownDebt(debt_id))?;
        let record = self.tokenization.debt.burn(&mut self.ledger, debt_id)?;

        let settled = match self.auction.close(debt_id) {
            Some(auction) => {
                self.ledger.transfer_non_fungible(
                    record.collateral_id,
                    module::LENDING,
                    auction.highest_bidder,
                )?;
                let proceeds = auction.highest_bid.min(record.principal);
                let surplus = auction.highest_bid - proceeds;
                self.ledger
                    .transfer(auction.bid_asset, module::AUCTION, module::LENDING, proceeds)?;
                if surplus > 0 {
                    self.ledger
                        .transfer(auction.bid_asset, module::AUCTION, borrower, surplus)?;
                }
                AuctionSettledEvent {
                    debt_id,
                    collateral_id: record.collateral_id,
                    winner: Some(auction.highest_bidder),
                    proceeds,
                    surplus_to_borrower: surplus,
                }
            }
            None => {
                self.ledger.transfer_non_fungible(
                    record.collateral_id,
                    module::LENDING,
                    borrower,
                )?;
                AuctionSettledEvent {
                    debt_id,
                    collateral_id: record.collateral_id,
                    winner: None,
                    proceeds: 0,
                    surplus_to_borrower: 0,
                }
            }
        };
        self.emit(EventPayload::AuctionSettled(settled));
        Ok(())
    }
}
