//! Composite Asset Protocol Simulation.
//!
//! Demonstrates the full protocol lifecycle including basket tokenization,
//! pooled lending, keeper-driven triggers, and liquidation auctions.

use composite_core::*;
use composite_core::tokenization::{UnwrapPayload, WrapPayload};

fn main() {
    println!("Composite Asset Protocol Simulation");
    println!("Tokenization, Lending, Triggers, Liquidation\n");

    scenario_1_fungible_baskets();
    scenario_2_owned_baskets();
    scenario_3_lending_lifecycle();
    scenario_4_keeper_cycle();
    scenario_5_liquidation_auction();
    scenario_6_leveraged_position();
    scenario_7_unclaimed_liquidation();

    println!("\nAll simulations completed successfully.");
}

fn setup() -> (Protocol, AccountId, AccountId, AssetId, AssetId) {
    let mut protocol = Protocol::new(ProtocolConfig::default());
    let alice = protocol.create_account();
    let bob = protocol.create_account();

    let usdc = protocol.list_token("USDC", 6).unwrap();
    let weth = protocol.list_token("WETH", 18).unwrap();
    protocol.set_price(usdc, 1);
    protocol.set_price(weth, 2_000);

    protocol.fund_wallet(alice, usdc, 100_000).unwrap();
    protocol.fund_wallet(alice, weth, 100).unwrap();
    protocol.fund_wallet(bob, usdc, 100_000).unwrap();
    protocol.fund_wallet(bob, weth, 100).unwrap();

    (protocol, alice, bob, usdc, weth)
}

/// Fungible basket: wrap, partial unwrap, proportional share.
fn scenario_1_fungible_baskets() {
    println!("Scenario 1: Fungible Baskets\n");

    let (mut protocol, alice, _, usdc, weth) = setup();

    let basket = protocol
        .wrap(
            alice,
            SYNTHETIC_FT_TAG,
            WrapPayload::FungibleBasket {
                assets: vec![usdc, weth],
                amounts: vec![10_000, 10],
                supply: 100,
            },
        )
        .unwrap();

    println!("  Alice wraps 10,000 USDC + 10 WETH into 100 units");
    println!("  Basket value: {}", protocol.valuate(basket, 100).unwrap());
    println!("  One unit: {}", protocol.valuate(basket, 1).unwrap());

    let returned = protocol.unwrap(alice, basket, UnwrapPayload::Units(25)).unwrap();
    println!("  Unwrapping 25 units returns: {:?}", returned);
    println!("  Remaining balance: {}\n", protocol.balance_of(alice, basket));
}

/// Owned basket: all-or-nothing unwrap, worthless after burn.
fn scenario_2_owned_baskets() {
    println!("Scenario 2: Owned Baskets\n");

    let (mut protocol, alice, _, usdc, weth) = setup();

    let basket = protocol
        .wrap(
            alice,
            SYNTHETIC_NFT_TAG,
            WrapPayload::Basket {
                assets: vec![usdc, weth],
                amounts: vec![5_000, 5],
            },
        )
        .unwrap();

    println!("  Alice wraps 5,000 USDC + 5 WETH into an owned basket");
    println!("  Owner: {:?}", protocol.owner_of(basket));
    println!("  Value: {}", protocol.valuate(basket, 1).unwrap());

    let returned = protocol.unwrap(alice, basket, UnwrapPayload::Whole).unwrap();
    println!("  Whole unwrap returns: {:?}", returned);
    println!("  Value after burn: {}\n", protocol.valuate(basket, 1).unwrap());
}

/// Deposit, borrow against collateral, repay, withdraw.
fn scenario_3_lending_lifecycle() {
    println!("Scenario 3: Lending Lifecycle\n");

    let (mut protocol, alice, bob, usdc, weth) = setup();

    protocol.add_bank(usdc).unwrap();
    protocol.deposit(alice, usdc, 50_000).unwrap();
    println!("  Alice deposits 50,000 USDC, claim: {}", protocol.pool_claim_of(alice, usdc));

    let result = protocol.borrow(bob, weth, 10, usdc, 15_000).unwrap();
    println!("  Bob borrows 15,000 USDC against 10 WETH");
    println!("  Debt id: {}, trigger: {}", result.debt_id, result.trigger_key);
    println!("  Bob's USDC: {}", protocol.balance_of(bob, usdc));

    let returned = protocol.repay(bob, result.debt_id).unwrap();
    println!("  Bob repays, receives: {:?}", returned);

    protocol.withdraw(alice, usdc, 50_000).unwrap();
    println!("  Alice withdraws her full claim\n");
}

/// Two stop losses, one keeper execution per perform call.
fn scenario_4_keeper_cycle() {
    println!("Scenario 4: Keeper Cycle\n");

    let (mut protocol, alice, _, _, weth) = setup();

    let first = protocol
        .register_trigger(
            alice,
            weth,
            1,
            STOP_LOSS_KIND,
            CheckPayload::StopLoss { asset: weth, amount: 1, threshold: 1_500 },
            TriggerHandler::Notify { tag: 1 },
        )
        .unwrap();
    let second = protocol
        .register_trigger(
            alice,
            weth,
            1,
            STOP_LOSS_KIND,
            CheckPayload::StopLoss { asset: weth, amount: 1, threshold: 1_800 },
            TriggerHandler::Notify { tag: 2 },
        )
        .unwrap();

    println!("  Registered stop losses at 1,500 and 1,800");

    let check = protocol.check_upkeep();
    println!("  At 2,000 nothing is ready: {}", !check.ready);

    protocol.set_price(weth, 1_400);
    let check = protocol.check_upkeep();
    println!("  At 1,400 both conditions hold, proof names {}", check.payload.unwrap().key);

    let result = protocol.perform_upkeep(check.payload.unwrap()).unwrap();
    println!("  Perform executes exactly one: {:?}", result.executed);
    println!(
        "  States: {:?} / {:?}",
        protocol.trigger_info(first).unwrap().state,
        protocol.trigger_info(second).unwrap().state
    );

    let check = protocol.check_upkeep();
    let result = protocol.perform_upkeep(check.payload.unwrap()).unwrap();
    println!("  Second cycle executes: {:?}\n", result.executed);
}

/// Underwater debt, competing bids, keeper settlement.
fn scenario_5_liquidation_auction() {
    println!("Scenario 5: Liquidation Auction\n");

    let (mut protocol, alice, bob, usdc, weth) = setup();
    let carol = protocol.create_account();
    protocol.fund_wallet(carol, usdc, 50_000).unwrap();

    protocol.add_bank(usdc).unwrap();
    protocol.deposit(alice, usdc, 50_000).unwrap();

    let position = protocol.borrow(bob, weth, 10, usdc, 15_000).unwrap();
    println!("  Bob borrows 15,000 USDC against 10 WETH @ 2,000");

    protocol.set_price(weth, 100);
    println!("  WETH crashes to 100, position is underwater");

    protocol.bid(carol, position.debt_id, 12_000).unwrap();
    protocol.bid(alice, position.debt_id, 16_000).unwrap();
    println!("  Carol bids 12,000, Alice outbids with 16,000 (Carol refunded)");

    let check = protocol.check_upkeep();
    let result = protocol.perform_upkeep(check.payload.unwrap()).unwrap();
    println!("  Keeper settles: {:?}", result.executed);
    println!("  Collateral wrapper owner: {:?}", protocol.owner_of(position.collateral_id));
    println!("  Bob's surplus: {} USDC over principal\n", 16_000 - 15_000);
}

/// Basket collateral with an embedded borrowed leg.
fn scenario_6_leveraged_position() {
    println!("Scenario 6: Leveraged Position\n");

    let (mut protocol, alice, bob, usdc, weth) = setup();

    protocol.add_bank(usdc).unwrap();
    protocol.deposit(alice, usdc, 50_000).unwrap();

    let position = protocol
        .open_position(bob, &[weth, usdc], &[10, 1_000], 1, 20_000)
        .unwrap();
    println!("  Bob opens a position: 10 WETH + 1,000 USDC basket, 20,000 borrowed USDC");
    println!("  Position value: {}", protocol.valuate(position.debt_id, 1).unwrap());

    let returned = protocol.close_position(bob, position.debt_id).unwrap();
    println!("  Closing returns the underlyings: {:?}\n", returned);
}

/// Liquidation with no bids reverts collateral to the borrower.
fn scenario_7_unclaimed_liquidation() {
    println!("Scenario 7: Unclaimed Liquidation\n");

    let (mut protocol, alice, bob, usdc, weth) = setup();

    protocol.add_bank(usdc).unwrap();
    protocol.deposit(alice, usdc, 50_000).unwrap();

    let position = protocol.borrow(bob, weth, 10, usdc, 15_000).unwrap();
    protocol.set_price(weth, 100);
    println!("  Position underwater, nobody bids");

    let check = protocol.check_upkeep();
    protocol.perform_upkeep(check.payload.unwrap()).unwrap();

    println!("  Collateral wrapper reverts to Bob: {:?}", protocol.owner_of(position.collateral_id));
    println!("  Pool absorbs the loss; events recorded: {}", protocol.events().len());
}
