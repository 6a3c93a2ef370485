// 10.1: protocol state and administrative entry points. the coordinator owns
// every subsystem plus the event log and logical clock; per-concern entry
// points live in the sibling files as additional impl blocks.

use crate::asset_id::{AssetId, TypeTag};
use crate::auction::{Auction, AuctionBook};
use crate::config::ProtocolConfig;
use crate::events::{
    Event, EventId, EventPayload, PriceUpdatedEvent, TokenListedEvent, TransferredEvent,
    WalletFundedEvent,
};
use crate::ledger::Ledger;
use crate::lending::Lending;
use crate::oracle::OracleRouter;
use crate::tokenization::{DebtRecord, TokenInfo, Tokenization, WrapperHandle};
use crate::trigger::{TriggerEngine, TriggerKey, TriggerRecord};
use crate::types::{module, AccountId, Timestamp};

use super::results::ProtocolError;

pub struct Protocol {
    pub(super) config: ProtocolConfig,
    pub(super) ledger: Ledger,
    pub(super) tokenization: Tokenization,
    pub(super) lending: Lending,
    pub(super) trigger: TriggerEngine,
    pub(super) auction: AuctionBook,
    pub(super) oracle: OracleRouter,
    events: Vec<Event>,
    next_event_id: u64,
    next_account_id: u64,
    now: Timestamp,
}

impl Protocol {
    pub fn new(config: ProtocolConfig) -> Self {
        Self {
            config,
            ledger: Ledger::new(),
            tokenization: Tokenization::with_builtin_types(),
            lending: Lending::new(),
            trigger: TriggerEngine::with_builtin_kinds(),
            auction: AuctionBook::new(),
            oracle: OracleRouter::new(),
            events: Vec::new(),
            next_event_id: 0,
            next_account_id: module::FIRST_USER,
            now: Timestamp::from_millis(0),
        }
    }

    pub fn config(&self) -> &ProtocolConfig {
        &self.config
    }

    // 10.1.1: logical clock. time only moves when the host says so, which keeps
    // maturity triggers and event ordering reproducible.

    pub fn time(&self) -> Timestamp {
        self.now
    }

    pub fn set_time(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn advance_time(&mut self, millis: i64) {
        self.now = Timestamp::from_millis(self.now.as_millis() + millis);
    }

    // 10.1.2: accounts.

    pub fn create_account(&mut self) -> AccountId {
        let account = AccountId(self.next_account_id);
        self.next_account_id += 1;
        account
    }

    pub(super) fn ensure_account(&self, account: AccountId) -> Result<(), ProtocolError> {
        if account.0 >= module::FIRST_USER && account.0 < self.next_account_id {
            Ok(())
        } else {
            Err(ProtocolError::AccountNotFound(account))
        }
    }

    // 10.1.3: listing, funding and pricing. these stand in for the external
    // token contracts and price feeds of a deployed system.

    pub fn list_token(&mut self, symbol: &str, decimals: u32) -> Result<AssetId, ProtocolError> {
        let asset = self.tokenization.tokens.list(symbol, decimals)?;
        self.emit(EventPayload::TokenListed(TokenListedEvent {
            asset,
            symbol: symbol.to_string(),
            decimals,
        }));
        Ok(asset)
    }

    /// Credit externally sourced tokens to a wallet.
    pub fn fund_wallet(
        &mut self,
        account: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(account)?;
        if !self.tokenization.tokens.is_listed(asset) {
            return Err(ProtocolError::InvalidArgument(format!(
                "{asset} is not a listed token"
            )));
        }
        self.ledger.credit(account, asset, amount)?;
        self.emit(EventPayload::WalletFunded(WalletFundedEvent {
            account,
            asset,
            amount,
        }));
        Ok(())
    }

    pub fn set_price(&mut self, asset: AssetId, price: u128) {
        self.oracle.set_price(asset, price);
        self.emit(EventPayload::PriceUpdated(PriceUpdatedEvent { asset, price }));
    }

    /// Open the registry to a new tag. The built-in books serve it.
    pub fn register_type(
        &mut self,
        tag: TypeTag,
        handle: WrapperHandle,
    ) -> Result<(), ProtocolError> {
        self.tokenization.register_type(tag, handle)?;
        Ok(())
    }

    /// Move an asset between user wallets. Fungible amounts or a whole
    /// non-fungible id (amount must be 1).
    pub fn transfer(
        &mut self,
        caller: AccountId,
        to: AccountId,
        asset: AssetId,
        amount: u128,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(caller)?;
        self.ensure_account(to)?;
        if asset.is_non_fungible() {
            if amount != 1 {
                return Err(ProtocolError::InvalidArgument(
                    "non-fungible transfer amount must be 1".into(),
                ));
            }
            self.ledger.transfer_non_fungible(asset, caller, to)?;
        } else {
            self.ledger.transfer(asset, caller, to, amount)?;
        }
        self.emit(EventPayload::Transferred(TransferredEvent {
            from: caller,
            to,
            asset,
            amount,
        }));
        Ok(())
    }

    // 10.1.4: read-only views.

    pub fn balance_of(&self, account: AccountId, asset: AssetId) -> u128 {
        self.ledger.balance_of(account, asset)
    }

    pub fn owner_of(&self, asset: AssetId) -> Option<AccountId> {
        self.ledger.owner_of(asset)
    }

    pub fn pool_claim_of(&self, account: AccountId, asset: AssetId) -> u128 {
        self.lending.claim_of(account, asset)
    }

    pub fn token_info(&self, asset: AssetId) -> Option<&TokenInfo> {
        self.tokenization.tokens.info(asset)
    }

    pub fn debt_info(&self, debt_id: AssetId) -> Option<&DebtRecord> {
        self.tokenization.debt.get(debt_id)
    }

    pub fn trigger_info(&self, key: TriggerKey) -> Option<&TriggerRecord> {
        self.trigger.get(key)
    }

    pub fn auction_info(&self, debt_id: AssetId) -> Option<&Auction> {
        self.auction.get(debt_id)
    }

    // 10.1.5: event log.

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub(super) fn emit(&mut self, payload: EventPayload) {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        self.events.push(Event::new(id, self.now, payload));
        if self.events.len() > self.config.max_events {
            self.events.remove(0);
        }
    }
}
