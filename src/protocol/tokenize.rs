// 10.2: wrap/unwrap/valuate entry points. thin shells over the tokenization
// registry that add caller validation and audit events.

use crate::asset_id::{AssetId, TypeTag};
use crate::events::{EventPayload, UnwrappedEvent, WrappedEvent};
use crate::tokenization::{UnwrapPayload, WrapPayload};
use crate::types::AccountId;

use super::core::Protocol;
use super::results::ProtocolError;

impl Protocol {
    /// Lock a basket of components and mint a new wrapper id of type `tag`.
    pub fn wrap(
        &mut self,
        caller: AccountId,
        tag: TypeTag,
        payload: WrapPayload,
    ) -> Result<AssetId, ProtocolError> {
        self.ensure_account(caller)?;
        let id = self
            .tokenization
            .wrap(&mut self.ledger, caller, tag, payload)?;
        self.emit(EventPayload::Wrapped(WrappedEvent {
            account: caller,
            tag,
            id,
        }));
        Ok(id)
    }

    /// Burn wrapper units and release the backing components to the caller.
    pub fn unwrap(
        &mut self,
        caller: AccountId,
        id: AssetId,
        payload: UnwrapPayload,
    ) -> Result<Vec<(AssetId, u128)>, ProtocolError> {
        self.ensure_account(caller)?;
        let returned = self
            .tokenization
            .unwrap(&mut self.ledger, caller, id, payload)?;
        self.emit(EventPayload::Unwrapped(UnwrappedEvent {
            account: caller,
            id,
            returned: returned.clone(),
        }));
        Ok(returned)
    }

    /// Oracle value of `amount` of `id`, recursing through wrapper records.
    pub fn valuate(&self, id: AssetId, amount: u128) -> Result<u128, ProtocolError> {
        Ok(self.tokenization.valuate(&self.oracle, id, amount)?)
    }
}
