// 6.0: trigger engine. stores user-registered "if condition then action"
// records and walks them through Registered -> {Executed | Cancelled}, both
// terminal. keys are monotonic and never reused; a dead record keeps its slot
// (owner cleared) so stale external references never resolve to a different
// logical trigger. readiness evaluation is pull-based and lives in the
// protocol keeper, which owns the ledger/oracle context the evaluators need.

use crate::asset_id::AssetId;
use crate::types::{AccountId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerKey(pub u64);

impl fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trigger-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerKindId(pub u32);

impl fmt::Display for TriggerKindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind-{}", self.0)
    }
}

pub const STOP_LOSS_KIND: TriggerKindId = TriggerKindId(1);
pub const TAKE_PROFIT_KIND: TriggerKindId = TriggerKindId(2);
pub const MATURITY_KIND: TriggerKindId = TriggerKindId(3);
pub const LIQUIDATION_KIND: TriggerKindId = TriggerKindId(4);

/// Evaluator family behind a kind id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerKind {
    /// Ready when the watched value falls to or below the threshold.
    StopLoss,
    /// Ready when the watched value rises to or above the threshold.
    TakeProfit,
    /// Ready once the deadline passes.
    Maturity,
    /// Ready when a debt position drops below the liquidation threshold.
    Liquidation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckPayload {
    StopLoss {
        asset: AssetId,
        amount: u128,
        threshold: u128,
    },
    TakeProfit {
        asset: AssetId,
        amount: u128,
        threshold: u128,
    },
    Maturity {
        matures_at: Timestamp,
    },
    Liquidation {
        debt_id: AssetId,
    },
}

impl CheckPayload {
    pub fn matches(&self, kind: TriggerKind) -> bool {
        matches!(
            (self, kind),
            (CheckPayload::StopLoss { .. }, TriggerKind::StopLoss)
                | (CheckPayload::TakeProfit { .. }, TriggerKind::TakeProfit)
                | (CheckPayload::Maturity { .. }, TriggerKind::Maturity)
                | (CheckPayload::Liquidation { .. }, TriggerKind::Liquidation)
        )
    }
}

/// Action run when a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerHandler {
    /// Settle the named debt through the liquidation/auction path.
    Liquidate { debt_id: AssetId },
    /// Record an audit event carrying the tag. Used by self-service triggers.
    Notify { tag: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    Registered,
    Executed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRecord {
    pub key: TriggerKey,
    /// Cleared to None when the trigger leaves Registered.
    pub owner: Option<AccountId>,
    pub collateral_asset: AssetId,
    /// Accounting lock only; registration moves no ledger balances.
    pub collateral_amount: u128,
    pub kind: TriggerKindId,
    pub check: CheckPayload,
    pub handler: TriggerHandler,
    pub state: TriggerState,
    pub registered_at: Timestamp,
}

/// Opaque proof returned by check and consumed by perform. Serializable so
/// external callers can cache it between the two calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformPayload {
    pub key: TriggerKey,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TriggerError {
    #[error("trigger kind {0} is not registered")]
    InvalidKind(TriggerKindId),

    #[error("trigger kind {0} already registered")]
    KindAlreadyRegistered(TriggerKindId),

    #[error("check payload does not match {0}")]
    PayloadMismatch(TriggerKindId),

    #[error("{account} is not the owner of {key}")]
    NotOwner { account: AccountId, key: TriggerKey },
}

#[derive(Debug, Clone, Default)]
pub struct TriggerEngine {
    kinds: BTreeMap<TriggerKindId, TriggerKind>,
    triggers: BTreeMap<TriggerKey, TriggerRecord>,
    next_key: u64,
}

impl TriggerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_kinds() -> Self {
        let mut engine = Self::new();
        engine.register_kind(STOP_LOSS_KIND, TriggerKind::StopLoss).expect("empty");
        engine.register_kind(TAKE_PROFIT_KIND, TriggerKind::TakeProfit).expect("empty");
        engine.register_kind(MATURITY_KIND, TriggerKind::Maturity).expect("empty");
        engine.register_kind(LIQUIDATION_KIND, TriggerKind::Liquidation).expect("empty");
        engine
    }

    pub fn register_kind(
        &mut self,
        id: TriggerKindId,
        kind: TriggerKind,
    ) -> Result<(), TriggerError> {
        if self.kinds.contains_key(&id) {
            return Err(TriggerError::KindAlreadyRegistered(id));
        }
        self.kinds.insert(id, kind);
        Ok(())
    }

    pub fn kind_of(&self, id: TriggerKindId) -> Option<TriggerKind> {
        self.kinds.get(&id).copied()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn register(
        &mut self,
        owner: AccountId,
        collateral_asset: AssetId,
        collateral_amount: u128,
        kind: TriggerKindId,
        check: CheckPayload,
        handler: TriggerHandler,
        now: Timestamp,
    ) -> Result<TriggerKey, TriggerError> {
        let registered_kind = self.kind_of(kind).ok_or(TriggerError::InvalidKind(kind))?;
        if !check.matches(registered_kind) {
            return Err(TriggerError::PayloadMismatch(kind));
        }

        let key = TriggerKey(self.next_key);
        self.next_key += 1;

        self.triggers.insert(
            key,
            TriggerRecord {
                key,
                owner: Some(owner),
                collateral_asset,
                collateral_amount,
                kind,
                check,
                handler,
                state: TriggerState::Registered,
                registered_at: now,
            },
        );
        Ok(key)
    }

    pub fn get(&self, key: TriggerKey) -> Option<&TriggerRecord> {
        self.triggers.get(&key)
    }

    /// Registered triggers in ascending key order (oldest first).
    pub fn iter_registered(&self) -> impl Iterator<Item = &TriggerRecord> {
        self.triggers
            .values()
            .filter(|record| record.state == TriggerState::Registered)
    }

    /// Transition a Registered trigger to Executed and hand back its handler.
    /// Returns None for anything not Registered so stale perform proofs are a
    /// no-op rather than an abort.
    pub fn mark_executed(&mut self, key: TriggerKey) -> Option<TriggerHandler> {
        let record = self.triggers.get_mut(&key)?;
        if record.state != TriggerState::Registered {
            return None;
        }
        record.state = TriggerState::Executed;
        record.owner = None;
        Some(record.handler.clone())
    }

    /// Owner-initiated cancel. Dead or unknown keys report NotOwner, the same
    /// answer a wrong caller gets, so callers cannot probe trigger liveness.
    pub fn cancel(&mut self, caller: AccountId, key: TriggerKey) -> Result<(), TriggerError> {
        let not_owner = TriggerError::NotOwner {
            account: caller,
            key,
        };
        let record = self.triggers.get_mut(&key).ok_or(not_owner.clone())?;
        if record.state != TriggerState::Registered || record.owner != Some(caller) {
            return Err(not_owner);
        }
        record.state = TriggerState::Cancelled;
        record.owner = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset() -> AssetId {
        AssetId(42)
    }

    fn stop_loss_payload(threshold: u128) -> CheckPayload {
        CheckPayload::StopLoss {
            asset: asset(),
            amount: 1,
            threshold,
        }
    }

    fn register_one(engine: &mut TriggerEngine, owner: AccountId) -> TriggerKey {
        engine
            .register(
                owner,
                asset(),
                1,
                STOP_LOSS_KIND,
                stop_loss_payload(100),
                TriggerHandler::Notify { tag: 7 },
                Timestamp::from_millis(0),
            )
            .unwrap()
    }

    #[test]
    fn keys_are_monotonic() {
        let mut engine = TriggerEngine::with_builtin_kinds();
        let a = register_one(&mut engine, AccountId(10));
        let b = register_one(&mut engine, AccountId(10));
        assert_eq!(a, TriggerKey(0));
        assert_eq!(b, TriggerKey(1));
    }

    #[test]
    fn unregistered_kind_rejected() {
        let mut engine = TriggerEngine::new();
        let err = engine
            .register(
                AccountId(10),
                asset(),
                1,
                STOP_LOSS_KIND,
                stop_loss_payload(100),
                TriggerHandler::Notify { tag: 0 },
                Timestamp::from_millis(0),
            )
            .unwrap_err();
        assert_eq!(err, TriggerError::InvalidKind(STOP_LOSS_KIND));
    }

    #[test]
    fn payload_must_match_kind() {
        let mut engine = TriggerEngine::with_builtin_kinds();
        let err = engine
            .register(
                AccountId(10),
                asset(),
                1,
                MATURITY_KIND,
                stop_loss_payload(100),
                TriggerHandler::Notify { tag: 0 },
                Timestamp::from_millis(0),
            )
            .unwrap_err();
        assert_eq!(err, TriggerError::PayloadMismatch(MATURITY_KIND));
    }

    #[test]
    fn execute_is_terminal_and_clears_owner() {
        let mut engine = TriggerEngine::with_builtin_kinds();
        let key = register_one(&mut engine, AccountId(10));

        assert!(engine.mark_executed(key).is_some());
        let record = engine.get(key).unwrap();
        assert_eq!(record.state, TriggerState::Executed);
        assert_eq!(record.owner, None);

        // second execution is a no-op
        assert!(engine.mark_executed(key).is_none());
    }

    #[test]
    fn cancel_rules() {
        let mut engine = TriggerEngine::with_builtin_kinds();
        let owner = AccountId(10);
        let stranger = AccountId(11);
        let key = register_one(&mut engine, owner);

        // wrong caller
        assert!(matches!(
            engine.cancel(stranger, key).unwrap_err(),
            TriggerError::NotOwner { .. }
        ));

        // unknown key
        assert!(matches!(
            engine.cancel(owner, TriggerKey(99)).unwrap_err(),
            TriggerError::NotOwner { .. }
        ));

        engine.cancel(owner, key).unwrap();
        assert_eq!(engine.get(key).unwrap().state, TriggerState::Cancelled);
        assert_eq!(engine.get(key).unwrap().owner, None);

        // cancelled is terminal, even for the former owner
        assert!(matches!(
            engine.cancel(owner, key).unwrap_err(),
            TriggerError::NotOwner { .. }
        ));

        // executed is terminal too
        let key2 = register_one(&mut engine, owner);
        engine.mark_executed(key2).unwrap();
        assert!(matches!(
            engine.cancel(owner, key2).unwrap_err(),
            TriggerError::NotOwner { .. }
        ));
    }

    #[test]
    fn iter_registered_is_ascending_and_skips_dead() {
        let mut engine = TriggerEngine::with_builtin_kinds();
        let a = register_one(&mut engine, AccountId(10));
        let b = register_one(&mut engine, AccountId(10));
        let c = register_one(&mut engine, AccountId(10));
        engine.cancel(AccountId(10), b).unwrap();

        let keys: Vec<TriggerKey> = engine.iter_registered().map(|r| r.key).collect();
        assert_eq!(keys, vec![a, c]);
    }
}
