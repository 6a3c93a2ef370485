// 9.0: every state change produces an event. used for audit trails, state
// reconstruction, and notifying external systems. the EventPayload enum lists
// all event types.

use crate::asset_id::{AssetId, TypeTag};
use crate::trigger::{TriggerKey, TriggerKindId};
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    // admin / boundary events
    TokenListed(TokenListedEvent),
    WalletFunded(WalletFundedEvent),
    PriceUpdated(PriceUpdatedEvent),
    Transferred(TransferredEvent),

    // tokenization events
    Wrapped(WrappedEvent),
    Unwrapped(UnwrappedEvent),

    // lending events
    BankAdded(BankAddedEvent),
    Deposit(DepositEvent),
    Withdrawal(WithdrawalEvent),
    Borrowed(BorrowedEvent),
    Repaid(RepaidEvent),

    // trigger events
    TriggerRegistered(TriggerRegisteredEvent),
    TriggerExecuted(TriggerExecutedEvent),
    TriggerCancelled(TriggerCancelledEvent),
    TriggerNotified(TriggerNotifiedEvent),

    // liquidation events
    BidPlaced(BidPlacedEvent),
    AuctionSettled(AuctionSettledEvent),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenListedEvent {
    pub asset: AssetId,
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletFundedEvent {
    pub account: AccountId,
    pub asset: AssetId,
    pub amount: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceUpdatedEvent {
    pub asset: AssetId,
    pub price: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferredEvent {
    pub from: AccountId,
    pub to: AccountId,
    pub asset: AssetId,
    pub amount: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WrappedEvent {
    pub account: AccountId,
    pub tag: TypeTag,
    pub id: AssetId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnwrappedEvent {
    pub account: AccountId,
    pub id: AssetId,
    pub returned: Vec<(AssetId, u128)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankAddedEvent {
    pub asset: AssetId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositEvent {
    pub account: AccountId,
    pub asset: AssetId,
    pub amount: u128,
    pub pool_claim: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalEvent {
    pub account: AccountId,
    pub asset: AssetId,
    pub amount: u128,
    pub pool_claim: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BorrowedEvent {
    pub account: AccountId,
    pub debt_id: AssetId,
    pub collateral_id: AssetId,
    pub debt_asset: AssetId,
    pub principal: u128,
    pub trigger_key: TriggerKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaidEvent {
    pub account: AccountId,
    pub debt_id: AssetId,
    pub principal: u128,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRegisteredEvent {
    pub key: TriggerKey,
    pub owner: AccountId,
    pub kind: TriggerKindId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerExecutedEvent {
    pub key: TriggerKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerCancelledEvent {
    pub key: TriggerKey,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerNotifiedEvent {
    pub key: TriggerKey,
    pub tag: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidPlacedEvent {
    pub debt_id: AssetId,
    pub bidder: AccountId,
    pub amount: u128,
    /// Previous highest bid refunded in the same call, if any.
    pub refunded: Option<(AccountId, u128)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSettledEvent {
    pub debt_id: AssetId,
    pub collateral_id: AssetId,
    /// None when nobody bid and the collateral reverted to the borrower.
    pub winner: Option<AccountId>,
    pub proceeds: u128,
    pub surplus_to_borrower: u128,
}
