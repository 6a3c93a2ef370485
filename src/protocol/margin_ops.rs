// 10.6: leveraged position entry points. a position is a basket wrap followed
// by a borrow against the wrapper, so the borrowed leg sits inside the outer
// collateral wrapper next to the user's own basket. closing is repay followed
// by unwrapping the basket back to its underlyings.

use crate::asset_id::{AssetId, SYNTHETIC_NFT_TAG};
use crate::tokenization::{UnwrapPayload, WrapPayload};
use crate::types::AccountId;

use super::core::Protocol;
use super::results::{BorrowResult, ProtocolError};

impl Protocol {
    /// Wrap the caller's basket and borrow `borrow_amount` more of the
    /// basket asset at `borrow_index` against it. The debt id in the result
    /// is the position handle.
    pub fn open_position(
        &mut self,
        caller: AccountId,
        assets: &[AssetId],
        amounts: &[u128],
        borrow_index: usize,
        borrow_amount: u128,
    ) -> Result<BorrowResult, ProtocolError> {
        self.ensure_account(caller)?;
        let borrow_asset = *assets.get(borrow_index).ok_or_else(|| {
            ProtocolError::InvalidArgument(format!("borrow index {borrow_index} out of range"))
        })?;
        if borrow_asset.is_non_fungible() {
            return Err(ProtocolError::InvalidArgument(
                "borrowed leg must be fungible".into(),
            ));
        }
        let inner = self.wrap(
            caller,
            SYNTHETIC_NFT_TAG,
            WrapPayload::Basket {
                assets: assets.to_vec(),
                amounts: amounts.to_vec(),
            },
        )?;
        match self.borrow(caller, inner, 1, borrow_asset, borrow_amount) {
            Ok(result) => Ok(result),
            Err(err) => {
                // give the basket back so a failed open leaves no trace
                self.unwrap(caller, inner, UnwrapPayload::Whole)?;
                Err(err)
            }
        }
    }

    /// Repay the position's debt and unwrap the recovered basket. Returns the
    /// underlyings handed back to the caller.
    pub fn close_position(
        &mut self,
        caller: AccountId,
        position_id: AssetId,
    ) -> Result<Vec<(AssetId, u128)>, ProtocolError> {
        let recovered = self.repay(caller, position_id)?;

        let mut returned = Vec::new();
        for (asset, amount) in recovered {
            if asset.tag() == SYNTHETIC_NFT_TAG {
                returned.extend(self.unwrap(caller, asset, UnwrapPayload::Whole)?);
            } else {
                returned.push((asset, amount));
            }
        }
        Ok(returned)
    }
}
