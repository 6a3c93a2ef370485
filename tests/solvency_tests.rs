//! Conservation invariant tests.
//!
//! These tests verify that no operation sequence can create or destroy
//! tokens: every unit is in a wallet, a module escrow, or accounted for by a
//! wrapper or pool record.

use composite_core::tokenization::{UnwrapPayload, WrapPayload};
use composite_core::*;
use proptest::prelude::*;

const FUNDED: u128 = 1_000_000;

fn total_in_system(protocol: &Protocol, accounts: &[AccountId], asset: AssetId) -> u128 {
    let wallets: u128 = accounts
        .iter()
        .map(|account| protocol.balance_of(*account, asset))
        .sum();
    let escrow = protocol.balance_of(module::SYNTHETIC_FT, asset)
        + protocol.balance_of(module::SYNTHETIC_NFT, asset)
        + protocol.balance_of(module::LENDING, asset)
        + protocol.balance_of(module::AUCTION, asset);
    wallets + escrow
}

proptest! {
    /// Deposits, withdrawals, borrows and repays move tokens around but the
    /// system total never changes, and the pool's claims stay covered by
    /// liquid balance plus outstanding principal.
    #[test]
    fn lending_conserves_tokens(
        ops in proptest::collection::vec((0u8..4, 1u128..5_000), 1..40),
    ) {
        let mut protocol = Protocol::new(ProtocolConfig::default());
        let alice = protocol.create_account();
        let bob = protocol.create_account();
        let accounts = [alice, bob];

        let usdc = protocol.list_token("USDC", 6).unwrap();
        let weth = protocol.list_token("WETH", 18).unwrap();
        protocol.set_price(usdc, 1);
        protocol.set_price(weth, 2_000);
        for account in accounts {
            protocol.fund_wallet(account, usdc, FUNDED).unwrap();
            protocol.fund_wallet(account, weth, FUNDED).unwrap();
        }
        protocol.add_bank(usdc).unwrap();
        protocol.deposit(alice, usdc, FUNDED / 2).unwrap();

        let mut debts: Vec<AssetId> = Vec::new();
        for (op, amount) in ops {
            match op {
                0 => { let _ = protocol.deposit(alice, usdc, amount); }
                1 => { let _ = protocol.withdraw(alice, usdc, amount); }
                2 => {
                    if let Ok(result) = protocol.borrow(bob, weth, 10, usdc, amount) {
                        debts.push(result.debt_id);
                    }
                }
                _ => {
                    if let Some(debt_id) = debts.pop() {
                        protocol.repay(bob, debt_id).unwrap();
                    }
                }
            }

            prop_assert_eq!(total_in_system(&protocol, &accounts, usdc), 2 * FUNDED);
            prop_assert_eq!(total_in_system(&protocol, &accounts, weth), 2 * FUNDED);

            let outstanding: u128 = debts
                .iter()
                .map(|id| protocol.debt_info(*id).unwrap().principal)
                .sum();
            let claims = protocol.pool_claim_of(alice, usdc) + protocol.pool_claim_of(bob, usdc);
            prop_assert_eq!(
                protocol.balance_of(module::LENDING, usdc) + outstanding,
                claims
            );
        }
    }

    /// Wrap and unwrap sequences conserve every component asset.
    #[test]
    fn tokenization_conserves_tokens(
        rounds in proptest::collection::vec((1u128..10_000, 1u128..100, 1u128..100), 1..20),
    ) {
        let mut protocol = Protocol::new(ProtocolConfig::default());
        let alice = protocol.create_account();
        let usdc = protocol.list_token("USDC", 6).unwrap();
        let weth = protocol.list_token("WETH", 18).unwrap();
        protocol.fund_wallet(alice, usdc, FUNDED).unwrap();
        protocol.fund_wallet(alice, weth, FUNDED).unwrap();

        for (usdc_amount, weth_amount, supply) in rounds {
            let basket = protocol.wrap(
                alice,
                SYNTHETIC_FT_TAG,
                WrapPayload::FungibleBasket {
                    assets: vec![usdc, weth],
                    amounts: vec![usdc_amount, weth_amount],
                    supply,
                },
            ).unwrap();
            prop_assert_eq!(total_in_system(&protocol, &[alice], usdc), FUNDED);
            prop_assert_eq!(total_in_system(&protocol, &[alice], weth), FUNDED);

            // partial then full unwrap drains the basket completely
            if supply > 1 {
                protocol.unwrap(alice, basket, UnwrapPayload::Units(supply / 2)).unwrap();
            }
            protocol.unwrap(alice, basket, UnwrapPayload::Whole).unwrap();
            prop_assert_eq!(protocol.balance_of(alice, usdc), FUNDED);
            prop_assert_eq!(protocol.balance_of(alice, weth), FUNDED);
        }
    }

    /// Liquidation settles every escrowed token somewhere: pool, winner or
    /// borrower. Nothing is left stranded under the auction account.
    #[test]
    fn liquidation_conserves_tokens(
        bid in 1u128..40_000,
        crash_price in 1u128..140,
    ) {
        let mut protocol = Protocol::new(ProtocolConfig::default());
        let alice = protocol.create_account();
        let bob = protocol.create_account();
        let accounts = [alice, bob];

        let usdc = protocol.list_token("USDC", 6).unwrap();
        let weth = protocol.list_token("WETH", 18).unwrap();
        protocol.set_price(usdc, 1);
        protocol.set_price(weth, 2_000);
        for account in accounts {
            protocol.fund_wallet(account, usdc, FUNDED).unwrap();
            protocol.fund_wallet(account, weth, FUNDED).unwrap();
        }
        protocol.add_bank(usdc).unwrap();
        protocol.deposit(alice, usdc, FUNDED / 2).unwrap();

        let position = protocol.borrow(bob, weth, 10, usdc, 15_000).unwrap();
        // 10 WETH below 150 puts the locked side under 110% of the principal
        protocol.set_price(weth, crash_price);
        protocol.bid(alice, position.debt_id, bid).unwrap();

        let check = protocol.check_upkeep();
        prop_assert!(check.ready);
        let result = protocol.perform_upkeep(check.payload.unwrap()).unwrap();
        prop_assert_eq!(result.executed, Some(position.trigger_key));

        prop_assert_eq!(total_in_system(&protocol, &accounts, usdc), 2 * FUNDED);
        prop_assert_eq!(total_in_system(&protocol, &accounts, weth), 2 * FUNDED);
        prop_assert_eq!(protocol.balance_of(module::AUCTION, usdc), 0);
        prop_assert_eq!(protocol.owner_of(position.collateral_id), Some(alice));
    }
}
