// 10.4: keeper surface. the two-phase check/perform cycle: check is read-only
// and hands back a serializable proof naming the lowest ready trigger key;
// perform re-validates that proof against live state and executes at most one
// trigger. a proof that went stale between the calls is a silent no-op.

use crate::asset_id::AssetId;
use crate::events::{
    EventPayload, TriggerCancelledEvent, TriggerExecutedEvent, TriggerNotifiedEvent,
    TriggerRegisteredEvent,
};
use crate::ledger::LedgerError;
use crate::trigger::{
    CheckPayload, PerformPayload, TriggerHandler, TriggerKey, TriggerKindId, TriggerRecord,
    TriggerState,
};
use crate::types::{AccountId, BPS_SCALE};

use super::core::Protocol;
use super::results::{CheckResult, PerformResult, ProtocolError};

impl Protocol {
    /// Register a self-service trigger. The owner must hold the collateral
    /// being locked; the liquidation handler is reserved for positions opened
    /// through borrow.
    pub fn register_trigger(
        &mut self,
        owner: AccountId,
        collateral_asset: AssetId,
        collateral_amount: u128,
        kind: TriggerKindId,
        check: CheckPayload,
        handler: TriggerHandler,
    ) -> Result<TriggerKey, ProtocolError> {
        self.ensure_account(owner)?;
        if matches!(handler, TriggerHandler::Liquidate { .. }) {
            return Err(ProtocolError::InvalidArgument(
                "liquidation triggers are registered by the lending module".into(),
            ));
        }
        if collateral_asset.is_non_fungible() {
            if collateral_amount != 1 {
                return Err(ProtocolError::InvalidArgument(
                    "non-fungible collateral amount must be 1".into(),
                ));
            }
            if self.ledger.owner_of(collateral_asset) != Some(owner) {
                return Err(LedgerError::NotOwner {
                    account: owner,
                    asset: collateral_asset,
                }
                .into());
            }
        } else {
            let available = self.ledger.balance_of(owner, collateral_asset);
            if collateral_amount > available {
                return Err(LedgerError::InsufficientBalance {
                    account: owner,
                    asset: collateral_asset,
                    requested: collateral_amount,
                    available,
                }
                .into());
            }
        }
        let now = self.time();
        let key = self
            .trigger
            .register(owner, collateral_asset, collateral_amount, kind, check, handler, now)?;
        self.emit(EventPayload::TriggerRegistered(TriggerRegisteredEvent {
            key,
            owner,
            kind,
        }));
        Ok(key)
    }

    pub fn cancel_trigger(
        &mut self,
        caller: AccountId,
        key: TriggerKey,
    ) -> Result<(), ProtocolError> {
        self.ensure_account(caller)?;
        self.trigger.cancel(caller, key)?;
        self.emit(EventPayload::TriggerCancelled(TriggerCancelledEvent { key }));
        Ok(())
    }

    /// Scan registered triggers in key order and report the first ready one.
    /// Read-only; the proof it returns is only as fresh as the state it saw.
    pub fn check_upkeep(&self) -> CheckResult {
        for record in self.trigger.iter_registered() {
            if self.trigger_ready(record) {
                return CheckResult {
                    ready: true,
                    payload: Some(PerformPayload { key: record.key }),
                };
            }
        }
        CheckResult::nothing_ready()
    }

    /// Execute the trigger named by a check proof. Re-validates readiness
    /// against current state first: an executed, cancelled, unknown or
    /// no-longer-ready key makes this a no-op, never an error.
    pub fn perform_upkeep(&mut self, payload: PerformPayload) -> Result<PerformResult, ProtocolError> {
        let ready = match self.trigger.get(payload.key) {
            Some(record) if record.state == TriggerState::Registered => self.trigger_ready(record),
            _ => false,
        };
        if !ready {
            return Ok(PerformResult { executed: None });
        }

        let handler = match self.trigger.mark_executed(payload.key) {
            Some(handler) => handler,
            None => return Ok(PerformResult { executed: None }),
        };
        self.emit(EventPayload::TriggerExecuted(TriggerExecutedEvent {
            key: payload.key,
        }));

        match handler {
            TriggerHandler::Notify { tag } => {
                self.emit(EventPayload::TriggerNotified(TriggerNotifiedEvent {
                    key: payload.key,
                    tag,
                }));
            }
            TriggerHandler::Liquidate { debt_id } => {
                self.settle_liquidation(debt_id)?;
            }
        }
        Ok(PerformResult {
            executed: Some(payload.key),
        })
    }

    /// Evaluate a trigger's condition against current prices and time. A
    /// condition that cannot be evaluated (missing price, vanished record)
    /// reads as not ready.
    fn trigger_ready(&self, record: &TriggerRecord) -> bool {
        match &record.check {
            CheckPayload::StopLoss {
                asset,
                amount,
                threshold,
            } => self
                .valuate(*asset, *amount)
                .map(|value| value <= *threshold)
                .unwrap_or(false),
            CheckPayload::TakeProfit {
                asset,
                amount,
                threshold,
            } => self
                .valuate(*asset, *amount)
                .map(|value| value >= *threshold)
                .unwrap_or(false),
            CheckPayload::Maturity { matures_at } => self.time() >= *matures_at,
            CheckPayload::Liquidation { debt_id } => self.debt_liquidatable(*debt_id),
        }
    }

    fn debt_liquidatable(&self, debt_id: AssetId) -> bool {
        let Some(record) = self.tokenization.debt.get(debt_id) else {
            return false;
        };
        let Ok(locked) = self.valuate(record.collateral_id, record.collateral_amount) else {
            return false;
        };
        let Ok(owed) = self.valuate(record.debt_asset, record.principal) else {
            return false;
        };
        let (Some(lhs), Some(rhs)) = (
            locked.checked_mul(BPS_SCALE),
            owed.checked_mul(self.config.liquidation_threshold.value()),
        ) else {
            return false;
        };
        lhs < rhs
    }
}
