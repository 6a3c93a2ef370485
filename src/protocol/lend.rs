// 10.3: lending entry points. deposits and withdrawals move pool liquidity
// between wallets and the lending module account; borrow locks collateral plus
// the borrowed leg inside a synthetic wrapper, mints a debt id against it and
// arms a liquidation trigger; repay tears all of that down in reverse.

use crate::asset_id::{AssetId, SYNTHETIC_NFT_TAG};
use crate::events::{
    BankAddedEvent, BorrowedEvent, DepositEvent, EventPayload, RepaidEvent,
    TriggerCancelledEvent, WithdrawalEvent,
};
use crate::ledger::LedgerError;
use crate::lending::LendingError;
use crate::tokenization::{DebtRecord, TokenizationError, WrapPayload};
use crate::trigger::{CheckPayload, TriggerHandler, LIQUIDATION_KIND};
use crate::types::{module, AccountId, BPS_SCALE};

use super::core::Protocol;
use super::results::{BorrowResult, ProtocolError};

impl Protocol {
    /// Open a deposit pool for a listed token.
    pub fn add_bank(&mut self, asset: AssetId) -> Result<(), ProtocolError> {
        if !self.tokenization.tokens.is_listed(asset) {
            return Err(ProtocolError::InvalidArgument(format!(
                "{asset} is not a listed token"
            )));
        }
        self.lending.add_bank(asset)?;
        self.emit(EventPayload::BankAdded(BankAddedEvent { asset }));
        Ok(())
    }

    pub fn deposit(
        &mut self,
        caller: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(caller)?;
        self.lending.bank(asset)?;

        self.ledger.transfer(asset, caller, module::LENDING, amount)?;
        if let Err(err) = self.lending.record_deposit(caller, asset, amount) {
            self.ledger.transfer(asset, module::LENDING, caller, amount)?;
            return Err(err.into());
        }

        let pool_claim = self.lending.claim_of(caller, asset);
        self.emit(EventPayload::Deposit(DepositEvent {
            account: caller,
            asset,
            amount,
            pool_claim,
        }));
        Ok(())
    }

    /// Redeem a pool claim. Fails when the claim is short or when the pool's
    /// liquid balance is, which happens while deposits are out on loan.
    pub fn withdraw(
        &mut self,
        caller: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(caller)?;
        self.lending.bank(asset)?;

        let liquid = self.ledger.balance_of(module::LENDING, asset);
        if amount > liquid {
            return Err(LendingError::InsufficientPoolBalance {
                asset,
                requested: amount,
                available: liquid,
            }
            .into());
        }
        self.lending.record_withdraw(caller, asset, amount)?;
        if let Err(err) = self.ledger.transfer(asset, module::LENDING, caller, amount) {
            self.lending
                .record_deposit(caller, asset, amount)
                .map_err(ProtocolError::from)?;
            return Err(err.into());
        }

        let pool_claim = self.lending.claim_of(caller, asset);
        self.emit(EventPayload::Withdrawal(WithdrawalEvent {
            account: caller,
            asset,
            amount,
            pool_claim,
        }));
        Ok(())
    }

    /// Borrow `debt_amount` of a pooled asset against collateral. The
    /// collateral and the borrowed leg are wrapped together into a synthetic
    /// held by the lending module; the caller receives a debt id and the
    /// position is guarded by a liquidation trigger from the start.
    pub fn borrow(
        &mut self,
        caller: AccountId,
        collateral_asset: AssetId,
        collateral_amount: u128,
        debt_asset: AssetId,
        debt_amount: u128,
    ) -> Result<BorrowResult, ProtocolError> {
        self.ensure_account(caller)?;
        self.lending.bank(debt_asset)?;
        if collateral_amount == 0 || debt_amount == 0 {
            return Err(ProtocolError::InvalidArgument(
                "collateral and principal must be positive".into(),
            ));
        }

        let liquid = self.ledger.balance_of(module::LENDING, debt_asset);
        if debt_amount > liquid {
            return Err(LendingError::InsufficientPoolBalance {
                asset: debt_asset,
                requested: debt_amount,
                available: liquid,
            }
            .into());
        }

        // the caller must already hold the collateral leg
        if collateral_asset.is_non_fungible() {
            if collateral_amount != 1 {
                return Err(ProtocolError::InvalidArgument(
                    "non-fungible collateral amount must be 1".into(),
                ));
            }
            if self.ledger.owner_of(collateral_asset) != Some(caller) {
                return Err(LedgerError::NotOwner {
                    account: caller,
                    asset: collateral_asset,
                }
                .into());
            }
        } else {
            let available = self.ledger.balance_of(caller, collateral_asset);
            if collateral_amount > available {
                return Err(LedgerError::InsufficientBalance {
                    account: caller,
                    asset: collateral_asset,
                    requested: collateral_amount,
                    available,
                }
                .into());
            }
        }

        // borrowed funds never leave the wrapper, so they count toward the
        // locked side of the ratio
        let collateral_value = self.valuate(collateral_asset, collateral_amount)?;
        let debt_value = self.valuate(debt_asset, debt_amount)?;
        let locked_value = collateral_value
            .checked_add(debt_value)
            .ok_or(LendingError::ArithmeticOverflow(debt_asset))?;
        let lhs = locked_value
            .checked_mul(BPS_SCALE)
            .ok_or(LendingError::ArithmeticOverflow(debt_asset))?;
        let rhs = debt_value
            .checked_mul(self.config.min_collateral_ratio.value())
            .ok_or(LendingError::ArithmeticOverflow(debt_asset))?;
        if lhs < rhs {
            return Err(LendingError::InsufficientCollateral {
                locked_value,
                debt_value,
                min_ratio: self.config.min_collateral_ratio,
            }
            .into());
        }

        let now = self.time();
        let debt_id = self.tokenization.debt.allocate(module::LENDING)?;

        // flash the principal to the caller so the wrap can pull both legs
        self.ledger
            .transfer(debt_asset, module::LENDING, caller, debt_amount)?;
        let wrap = self.tokenization.wrap(
            &mut self.ledger,
            caller,
            SYNTHETIC_NFT_TAG,
            WrapPayload::Basket {
                assets: vec![collateral_asset, debt_asset],
                amounts: vec![collateral_amount, debt_amount],
            },
        );
        let collateral_id = match wrap {
            Ok(id) => id,
            Err(err) => {
                self.ledger
                    .transfer(debt_asset, caller, module::LENDING, debt_amount)?;
                return Err(err.into());
            }
        };
        self.ledger
            .transfer_non_fungible(collateral_id, caller, module::LENDING)?;

        let trigger_key = self.trigger.register(
            module::LENDING,
            collateral_id,
            1,
            LIQUIDATION_KIND,
            CheckPayload::Liquidation { debt_id },
            TriggerHandler::Liquidate { debt_id },
            now,
        )?;

        self.tokenization.debt.mint(
            &mut self.ledger,
            caller,
            debt_id,
            DebtRecord {
                collateral_id,
                collateral_amount: 1,
                debt_asset,
                principal: debt_amount,
                opened_at: now,
                trigger_key,
            },
        )?;

        self.emit(EventPayload::Borrowed(BorrowedEvent {
            account: caller,
            debt_id,
            collateral_id,
            debt_asset,
            principal: debt_amount,
            trigger_key,
        }));
        Ok(BorrowResult {
            debt_id,
            collateral_id,
            trigger_key,
        })
    }

    /// Settle a debt: the principal goes back to the pool, everything else in
    /// the collateral wrapper goes back to the borrower. Returns what the
    /// caller received. If the wrapper's borrowed leg was partially spent the
    /// difference is debited from the caller's wallet.
    pub fn repay(
        &mut self,
        caller: AccountId,
        debt_id: AssetId,
    ) -> Result<Vec<(AssetId, u128)>, ProtocolError> {
        self.ensure_account(caller)?;
        let record = self
            .tokenization
            .debt
            .get(debt_id)
            .cloned()
            .ok_or(LendingError::UnknownDebt(debt_id))?;
        if self.ledger.owner_of(debt_id) != Some(caller) {
            return Err(LendingError::NotOwner {
                account: caller,
                debt_id,
            }
            .into());
        }

        // the wrapper may cover less than the principal; the caller's wallet
        // must cover the shortfall before anything is torn down
        let basket = self
            .tokenization
            .synthetic_nft
            .get(record.collateral_id)
            .ok_or(TokenizationError::UnknownRecord(record.collateral_id))?;
        let wrapped_principal: u128 = basket
            .components
            .iter()
            .filter(|(asset, _)| *asset == record.debt_asset)
            .map(|(_, amount)| *amount)
            .sum();
        let shortfall = record.principal.saturating_sub(wrapped_principal);
        if shortfall > 0 {
            let available = self.ledger.balance_of(caller, record.debt_asset);
            if shortfall > available {
                return Err(LedgerError::InsufficientBalance {
                    account: caller,
                    asset: record.debt_asset,
                    requested: shortfall,
                    available,
                }
                .into());
            }
        }

        // a keeper may have opened an auction ahead of the trigger firing;
        // repaying voids it and releases the standing bid from escrow
        if let Some(auction) = self.auction.close(debt_id) {
            self.ledger.transfer(
                auction.bid_asset,
                module::AUCTION,
                auction.highest_bidder,
                auction.highest_bid,
            )?;
        }

        self.trigger.cancel(module::LENDING, record.trigger_key)?;
        self.emit(EventPayload::TriggerCancelled(TriggerCancelledEvent {
            key: record.trigger_key,
        }));

        self.tokenization.debt.burn(&mut self.ledger, debt_id)?;
        let components = self.tokenization.unwrap(
            &mut self.ledger,
            module::LENDING,
            record.collateral_id,
            crate::tokenization::UnwrapPayload::Whole,
        )?;

        // principal stays with the pool, the rest flows to the caller
        let mut remaining = record.principal;
        let mut returned = Vec::new();
        for (asset, amount) in components {
            if asset.is_non_fungible() {
                self.ledger
                    .transfer_non_fungible(asset, module::LENDING, caller)?;
                returned.push((asset, amount));
                continue;
            }
            let mut pass = amount;
            if asset == record.debt_asset && remaining > 0 {
                let kept = remaining.min(amount);
                remaining -= kept;
                pass -= kept;
            }
            if pass > 0 {
                self.ledger.transfer(asset, module::LENDING, caller, pass)?;
                returned.push((asset, pass));
            }
        }
        if remaining > 0 {
            self.ledger
                .transfer(record.debt_asset, caller, module::LENDING, remaining)?;
        }

        self.emit(EventPayload::Repaid(RepaidEvent {
            account: caller,
            debt_id,
            principal: record.principal,
        }));
        Ok(returned)
    }
}
