//! Synthetic Maker Simulation.
//!
//! Walks the maker through minting, price moves, netting, burning and
//! collateral redemption, printing every figure in decimal units.
//! Set `RUST_LOG=synth_maker=debug` to see the event log.

use rust_decimal_macros::dec;
use synth_maker::*;
use tracing_subscriber::EnvFilter;

const CREATOR: AccountId = AccountId(1);
const ALICE: AccountId = AccountId(2);
const BOB: AccountId = AccountId(3);
const ORACLE: AccountId = AccountId(4);
const MAKER: AccountId = AccountId(100);

fn main() -> Result<(), MakerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Synthetic Maker Simulation");
    println!("Single Market, Pooled Collateral, Full Lifecycle\n");

    scenario_1_mint_and_price_up()?;
    scenario_2_price_down()?;
    scenario_3_net_short()?;
    scenario_4_burn_and_redeem()?;
    scenario_5_two_traders()?;

    println!("\nAll simulations completed successfully.");
    Ok(())
}

/// Fresh maker with the oracle at 1.0000 and both traders funded.
fn setup(config: MakerConfig) -> Result<Maker, MakerError> {
    let mut collateral = TokenLedger::new(CREATOR, Amount::tokens(1000), "USD", "USD", false);
    let mut long = TokenLedger::new(CREATOR, Amount::zero(), "SPY", "S&P 500", false);
    let mut short = TokenLedger::new(CREATOR, Amount::zero(), "XSPY", "S&P 500 Short", true);

    for trader in [ALICE, BOB] {
        collateral.transfer(CREATOR, trader, Amount::tokens(10))?;
    }
    long.transfer_ownership(CREATOR, MAKER)?;
    short.transfer_ownership(CREATOR, MAKER)?;

    let mut maker = Maker::new(MAKER, config, MakerAssets { collateral, long, short }, ORACLE)?;
    maker.set_time(Timestamp::now());
    maker.set_price(ORACLE, PRICE_SCALE)?;
    for trader in [ALICE, BOB] {
        maker.approve_collateral(trader, Amount::tokens(10));
    }
    Ok(maker)
}

fn print_state(maker: &Maker, who: &str, account: AccountId) -> Result<(), MakerError> {
    let summary = maker.summary(account)?;
    let pos = summary.position;
    println!(
        "    {who}: long {}, short {}, net {}, entry {}",
        pos.long_balance, pos.short_balance, summary.net_exposure, pos.entry_price
    );
    println!(
        "    {who}: collateral {}, required {}, pnl {}, realized {}",
        pos.collateral_locked, summary.required_collateral, summary.unrealized_pnl, pos.realized_pnl
    );
    Ok(())
}

fn set_price(maker: &mut Maker, value: rust_decimal::Decimal) -> Result<(), MakerError> {
    let price = Price::from_decimal(value).ok_or(MakerError::InvalidInput("price must be positive"))?;
    maker.set_price(ORACLE, price.raw())?;
    println!("  Price set to {}", price);
    Ok(())
}

/// Mint one long and watch the requirement fall as price doubles.
fn scenario_1_mint_and_price_up() -> Result<(), MakerError> {
    println!("Scenario 1: Mint Long, Price Up\n");

    let mut maker = setup(MakerConfig::spy())?;
    let result = maker.mint_long_tokens(ALICE, Amount::tokens(1))?;
    println!("  Alice mints 1 long, collateral debit {}", result.collateral_debit);
    print_state(&maker, "Alice", ALICE)?;

    set_price(&mut maker, dec!(2))?;
    print_state(&maker, "Alice", ALICE)?;
    println!();
    Ok(())
}

/// Same position, price halves.
fn scenario_2_price_down() -> Result<(), MakerError> {
    println!("Scenario 2: Mint Long, Price Down\n");

    let mut maker = setup(MakerConfig::spy())?;
    maker.mint_long_tokens(ALICE, Amount::tokens(1))?;
    set_price(&mut maker, dec!(0.5))?;
    print_state(&maker, "Alice", ALICE)?;

    match maker.redeem_collateral(ALICE, Amount::new(1)) {
        Ok(_) => println!("  unexpected: redemption accepted"),
        Err(err) => println!("  Redemption refused: {err}"),
    }
    println!();
    Ok(())
}

/// Long and short held together; margin is on the net.
fn scenario_3_net_short() -> Result<(), MakerError> {
    println!("Scenario 3: Gross Long and Short, Net Short\n");

    let mut maker = setup(MakerConfig::top_up())?;
    maker.mint_long_tokens(ALICE, Amount::tokens(1))?;
    let result = maker.mint_short_tokens(ALICE, Amount::tokens(2))?;
    println!("  Alice mints 1 long then 2 short, second debit {}", result.collateral_debit);
    print_state(&maker, "Alice", ALICE)?;
    println!();
    Ok(())
}

/// Round trip: mint, burn, take everything back.
fn scenario_4_burn_and_redeem() -> Result<(), MakerError> {
    println!("Scenario 4: Burn and Redeem\n");

    let mut maker = setup(MakerConfig::spy())?;
    let before = maker.assets().collateral.balance_of(ALICE);

    maker.mint_long_tokens(ALICE, Amount::tokens(1))?;
    maker.burn_long_tokens(ALICE, Amount::tokens(1))?;
    print_state(&maker, "Alice", ALICE)?;

    let locked = maker.get_collateral(ALICE);
    maker.redeem_collateral(ALICE, locked)?;
    let after = maker.assets().collateral.balance_of(ALICE);
    println!("  Collateral before {}, after {}\n", before, after);
    Ok(())
}

/// Two traders on opposite sides through a price path.
fn scenario_5_two_traders() -> Result<(), MakerError> {
    println!("Scenario 5: Two Traders, Price Path\n");

    let mut maker = setup(MakerConfig::spy())?;
    maker.mint_long_tokens(ALICE, Amount::tokens(3))?;
    maker.mint_short_tokens(BOB, Amount::tokens(2))?;

    for value in [dec!(1.2), dec!(0.9), dec!(1.5)] {
        maker.advance_time(60_000);
        set_price(&mut maker, value)?;
        print_state(&maker, "Alice", ALICE)?;
        print_state(&maker, "Bob", BOB)?;
    }

    println!(
        "  Pool holds {}, locked {}, solvent {}",
        maker.pool_collateral_balance(),
        maker.total_collateral_locked()?,
        maker.is_pool_solvent()
    );
    println!("  Events logged: {}", maker.events().len());
    Ok(())
}
