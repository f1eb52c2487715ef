//! Maker lifecycle tests.
//!
//! Mint, burn, price moves and collateral redemption through the facade, with
//! the ledgers checked alongside the bookkeeping.

use rust_decimal_macros::dec;
use synth_maker::*;

const CREATOR: AccountId = AccountId(1);
const USER1: AccountId = AccountId(2);
const USER2: AccountId = AccountId(3);
const ORACLE: AccountId = AccountId(4);
const MAKER: AccountId = AccountId(100);

const ONE: u128 = TOKEN_SCALE;

fn tokens(value: rust_decimal::Decimal) -> Amount {
    Amount::from_decimal(value).unwrap()
}

fn signed(value: rust_decimal::Decimal) -> SignedAmount {
    SignedAmount::from_decimal(value).unwrap()
}

fn price(value: rust_decimal::Decimal) -> u128 {
    Price::from_decimal(value).unwrap().raw()
}

/// Ledgers as deployed: creator owns everything, USER1 holds 10 USD.
fn ledgers() -> MakerAssets {
    let mut collateral = TokenLedger::new(CREATOR, Amount::tokens(1000), "USD", "USD", false);
    collateral.transfer(CREATOR, USER1, Amount::tokens(10)).unwrap();
    MakerAssets {
        collateral,
        long: TokenLedger::new(CREATOR, Amount::zero(), "SPY", "S&P 500", false),
        short: TokenLedger::new(CREATOR, Amount::zero(), "XSPY", "S&P 500 Short", true),
    }
}

fn setup_with(config: MakerConfig) -> Maker {
    let mut maker = Maker::new(MAKER, config, ledgers(), ORACLE).unwrap();
    maker.set_price(ORACLE, PRICE_SCALE).unwrap();
    let assets = maker.assets_mut();
    assets.long.transfer_ownership(CREATOR, MAKER).unwrap();
    assets.short.transfer_ownership(CREATOR, MAKER).unwrap();
    maker.approve_collateral(USER1, Amount::tokens(10));
    maker
}

fn setup() -> Maker {
    setup_with(MakerConfig::spy())
}

fn usd_balance(maker: &Maker, account: AccountId) -> Amount {
    maker.assets().collateral.balance_of(account)
}

mod minting {
    use super::*;

    #[test]
    fn mint_long_takes_collateral() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();

        assert_eq!(usd_balance(&maker, USER1), tokens(dec!(9.8)));
        assert_eq!(maker.assets().long.balance_of(USER1), Amount::tokens(1));
        assert_eq!(maker.get_collateral(USER1), tokens(dec!(0.2)));
    }

    #[test]
    fn mint_short_takes_collateral() {
        let mut maker = setup();
        maker.mint_short_tokens(USER1, Amount::tokens(1)).unwrap();

        assert_eq!(usd_balance(&maker, USER1), tokens(dec!(9.8)));
        assert_eq!(maker.assets().short.balance_of(USER1), Amount::tokens(1));
        assert_eq!(maker.get_net_exposure(USER1).unwrap(), signed(dec!(-1)));
    }

    #[test]
    fn mint_long_and_short_with_top_up() {
        let mut maker = setup_with(MakerConfig::top_up());
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.mint_short_tokens(USER1, Amount::tokens(2)).unwrap();

        // the netting mint is already covered
        assert_eq!(usd_balance(&maker, USER1), tokens(dec!(9.8)));
        assert_eq!(maker.assets().long.balance_of(USER1), Amount::tokens(1));
        assert_eq!(maker.assets().short.balance_of(USER1), Amount::tokens(2));
    }

    #[test]
    fn mint_long_and_short_per_mint_notional() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.mint_short_tokens(USER1, Amount::tokens(2)).unwrap();

        assert_eq!(usd_balance(&maker, USER1), tokens(dec!(9.4)));
        assert_eq!(maker.get_collateral(USER1), tokens(dec!(0.6)));
    }

    #[test]
    fn mint_debit_uses_current_price() {
        let mut maker = setup();
        maker.set_price(ORACLE, price(dec!(2.5))).unwrap();
        let result = maker.mint_long_tokens(USER1, Amount::tokens(2)).unwrap();

        assert_eq!(result.collateral_debit, tokens(dec!(1))); // 0.2 * 2 * 2.5
        assert_eq!(maker.get_position(USER1).entry_price.raw(), 25_000);
    }

    #[test]
    fn mint_before_price_fails() {
        let mut maker = Maker::new(MAKER, MakerConfig::spy(), ledgers(), ORACLE).unwrap();
        maker.approve_collateral(USER1, Amount::tokens(10));

        let err = maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap_err();
        assert_eq!(err, MakerError::PriceNotSet);
    }

    #[test]
    fn mint_before_ownership_transfer_rolls_back() {
        let mut maker = Maker::new(MAKER, MakerConfig::spy(), ledgers(), ORACLE).unwrap();
        maker.set_price(ORACLE, PRICE_SCALE).unwrap();
        maker.approve_collateral(USER1, Amount::tokens(10));

        let err = maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap_err();
        assert!(matches!(err, MakerError::Ledger(LedgerError::Unauthorized { .. })));

        // collateral pull was undone with the failed mint
        assert_eq!(usd_balance(&maker, USER1), Amount::tokens(10));
        assert_eq!(
            maker.assets().collateral.allowance(USER1, MAKER),
            Amount::tokens(10)
        );
        assert!(maker.get_collateral(USER1).is_zero());
        assert!(maker.get_position(USER1).is_empty());
    }

    #[test]
    fn mint_beyond_balance_fails() {
        let mut maker = setup();
        maker.approve_collateral(USER1, Amount::tokens(1000));

        // 0.2 * 60 = 12 > 10 held
        let err = maker.mint_long_tokens(USER1, Amount::tokens(60)).unwrap_err();
        assert!(matches!(err, MakerError::Ledger(LedgerError::InsufficientBalance { .. })));
        assert!(maker.assets().long.balance_of(USER1).is_zero());
    }

    #[test]
    fn mint_is_logged() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();

        match &maker.recent_events(1)[0].payload {
            EventPayload::Minted(minted) => {
                assert_eq!(minted.account_id, USER1);
                assert_eq!(minted.side, Side::Long);
                assert_eq!(minted.collateral_debit, tokens(dec!(0.2)));
                assert_eq!(minted.new_entry_price.raw(), 10_000);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}

mod burning {
    use super::*;

    fn setup_open() -> Maker {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(2)).unwrap();
        maker.mint_short_tokens(USER1, Amount::tokens(1)).unwrap();
        maker
    }

    #[test]
    fn burn_long_tokens() {
        let mut maker = setup_open();
        maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap();

        assert_eq!(maker.assets().long.balance_of(USER1), Amount::tokens(1));
        assert_eq!(maker.get_position(USER1).long_balance, Amount::tokens(1));
        assert!(maker.get_net_exposure(USER1).unwrap().is_zero());
        assert!(maker.get_position(USER1).entry_price.is_zero());
    }

    #[test]
    fn burn_short_tokens() {
        let mut maker = setup_open();
        maker.burn_short_tokens(USER1, Amount::tokens(1)).unwrap();

        assert!(maker.assets().short.balance_of(USER1).is_zero());
        assert_eq!(maker.get_net_exposure(USER1).unwrap(), signed(dec!(2)));
        assert_eq!(maker.get_position(USER1).entry_price.raw(), 10_000);
    }

    #[test]
    fn burn_long_and_short() {
        let mut maker = setup_open();
        maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.burn_short_tokens(USER1, Amount::tokens(1)).unwrap();

        assert_eq!(maker.assets().long.balance_of(USER1), Amount::tokens(1));
        assert!(maker.assets().short.balance_of(USER1).is_zero());
        assert!(maker.position_mirrors_ledger(USER1));
    }

    #[test]
    fn burn_keeps_collateral_locked() {
        let mut maker = setup_open();
        let locked = maker.get_collateral(USER1);
        maker.burn_long_tokens(USER1, Amount::tokens(2)).unwrap();

        assert_eq!(maker.get_collateral(USER1), locked);
        assert!(maker.get_redeemable_collateral(USER1).unwrap() > Amount::zero());
    }

    #[test]
    fn burn_more_than_held_fails() {
        let mut maker = setup_open();
        let err = maker.burn_short_tokens(USER1, Amount::tokens(2)).unwrap_err();
        assert_eq!(
            err,
            MakerError::InsufficientBalance {
                side: Side::Short,
                requested: Amount::tokens(2),
                available: Amount::tokens(1),
            }
        );
    }

    #[test]
    fn burn_after_moving_tokens_away_rolls_back() {
        let mut maker = setup_open();
        maker
            .assets_mut()
            .long
            .transfer(USER1, USER2, Amount::tokens(2))
            .unwrap();
        assert!(!maker.position_mirrors_ledger(USER1));

        let before = maker.get_position(USER1);
        let err = maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap_err();
        assert!(matches!(err, MakerError::Ledger(LedgerError::InsufficientBalance { .. })));
        assert_eq!(maker.get_position(USER1), before);
    }

    #[test]
    fn holder_without_position_cannot_burn() {
        let mut maker = setup_open();
        maker
            .assets_mut()
            .long
            .transfer(USER1, USER2, Amount::tokens(1))
            .unwrap();

        let err = maker.burn_long_tokens(USER2, Amount::tokens(1)).unwrap_err();
        assert!(matches!(err, MakerError::InsufficientBalance { .. }));
    }
}

mod price_changes {
    use super::*;

    fn setup_long() -> Maker {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker
    }

    #[test]
    fn price_increase_updates_pnl_and_requirement() {
        let mut maker = setup_long();
        assert_eq!(maker.get_required_collateral(USER1).unwrap(), tokens(dec!(0.2)));
        assert!(maker.get_pnl(USER1).unwrap().is_zero());

        maker.set_price(ORACLE, price(dec!(2))).unwrap();
        assert!(maker.get_required_collateral(USER1).unwrap().is_zero());
        assert_eq!(maker.get_pnl(USER1).unwrap(), signed(dec!(1)));
    }

    #[test]
    fn price_decrease_updates_pnl_and_requirement() {
        let mut maker = setup_long();
        maker.set_price(ORACLE, price(dec!(0.5))).unwrap();

        assert_eq!(maker.get_pnl(USER1).unwrap(), signed(dec!(-0.5)));
        assert_eq!(maker.get_required_collateral(USER1).unwrap(), tokens(dec!(0.7)));
    }

    #[test]
    fn price_increase_with_long_and_short() {
        let mut maker = setup_long();
        maker.mint_short_tokens(USER1, tokens(dec!(0.5))).unwrap();
        maker.set_price(ORACLE, price(dec!(2))).unwrap();

        assert_eq!(maker.get_pnl(USER1).unwrap(), signed(dec!(0.5)));
        assert!(maker.get_required_collateral(USER1).unwrap().is_zero());
    }

    #[test]
    fn netting_at_profit_realizes_gain() {
        let mut maker = setup_long();
        maker.set_price(ORACLE, price(dec!(3))).unwrap();
        let result = maker.mint_short_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.set_price(ORACLE, price(dec!(2))).unwrap();

        assert_eq!(result.realized_pnl, signed(dec!(2)));
        // flat exposure carries no unrealized pnl and no requirement
        assert!(maker.get_pnl(USER1).unwrap().is_zero());
        assert!(maker.get_required_collateral(USER1).unwrap().is_zero());
        assert_eq!(maker.get_realized_pnl(USER1), signed(dec!(2)));
        assert_eq!(maker.get_total_pnl(USER1).unwrap(), signed(dec!(2)));
    }

    #[test]
    fn flip_realizes_gain_and_reopens() {
        let mut maker = setup_long();
        maker.set_price(ORACLE, price(dec!(3))).unwrap();
        let result = maker.mint_short_tokens(USER1, Amount::tokens(2)).unwrap();

        // the long leg's +2 is booked, the short 1 opens at 3.0
        assert_eq!(result.realized_pnl, signed(dec!(2)));
        assert_eq!(maker.get_net_exposure(USER1).unwrap(), signed(dec!(-1)));
        assert_eq!(maker.get_position(USER1).entry_price.raw(), 30_000);
        assert!(maker.get_pnl(USER1).unwrap().is_zero());
        assert_eq!(maker.get_total_pnl(USER1).unwrap(), signed(dec!(2)));
    }

    #[test]
    fn flip_at_loss_keeps_basis_positive() {
        let mut maker = setup();
        maker.set_price(ORACLE, price(dec!(10))).unwrap();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.set_price(ORACLE, price(dec!(1))).unwrap();
        let result = maker.mint_short_tokens(USER1, Amount::tokens(2)).unwrap();

        assert_eq!(result.realized_pnl, signed(dec!(-9)));
        let position = maker.get_position(USER1);
        assert_eq!(position.entry_price.raw(), 10_000);
        assert_eq!(maker.get_net_exposure(USER1).unwrap(), signed(dec!(-1)));
        assert_eq!(maker.get_required_collateral(USER1).unwrap(), tokens(dec!(0.2)));

        // the short now loses as price climbs back, and the requirement follows
        maker.set_price(ORACLE, price(dec!(4))).unwrap();
        assert_eq!(maker.get_pnl(USER1).unwrap(), signed(dec!(-3)));
        assert_eq!(maker.get_required_collateral(USER1).unwrap(), tokens(dec!(3.2)));
        assert_eq!(maker.get_total_pnl(USER1).unwrap(), signed(dec!(-12)));
    }

    #[test]
    fn only_price_setter_sets_price() {
        let mut maker = setup_long();
        let err = maker.set_price(USER1, price(dec!(5))).unwrap_err();
        assert!(matches!(err, MakerError::Unauthorized { caller: USER1, .. }));
        assert_eq!(maker.get_price().raw(), PRICE_SCALE);

        match &maker.recent_events(1)[0].payload {
            EventPayload::CallRejected(rejected) => {
                assert_eq!(rejected.operation, Operation::SetPrice);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn price_reports_carry_maker_time() {
        let mut maker = setup_long();
        maker.set_time(Timestamp::from_millis(1_000));
        maker.advance_time(500);
        let report = maker.set_price(ORACLE, price(dec!(1.25))).unwrap();

        assert_eq!(report.previous.raw(), PRICE_SCALE);
        assert_eq!(report.timestamp, Timestamp::from_millis(1_500));
        assert_eq!(maker.oracle().updated_at(), Some(Timestamp::from_millis(1_500)));
        assert_eq!(maker.recent_events(1)[0].timestamp, Timestamp::from_millis(1_500));
    }

    #[test]
    fn zero_price_is_invalid() {
        let mut maker = setup_long();
        let err = maker.set_price(ORACLE, 0).unwrap_err();
        assert!(matches!(err, MakerError::InvalidInput(_)));
        assert_eq!(maker.get_price().raw(), PRICE_SCALE);
    }
}

mod redemption {
    use super::*;

    #[test]
    fn redeem_all_after_burn() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap();

        let collateral = maker.get_collateral(USER1);
        maker.redeem_collateral(USER1, collateral).unwrap();

        assert!(maker.get_collateral(USER1).is_zero());
        assert_eq!(usd_balance(&maker, USER1), Amount::tokens(10));
        assert!(maker.get_position(USER1).is_empty());
        assert_eq!(maker.positions_iter().count(), 0);
    }

    #[test]
    fn redeem_surplus_from_profit() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.set_price(ORACLE, price(dec!(2))).unwrap();

        // requirement is zero at 2.0, so the whole 0.2 is free
        let redeemable = maker.get_redeemable_collateral(USER1).unwrap();
        assert_eq!(redeemable, tokens(dec!(0.2)));
        maker.redeem_collateral(USER1, redeemable).unwrap();
        assert!(maker.get_collateral(USER1).is_zero());
    }

    #[test]
    fn redeem_below_requirement_fails() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();

        let err = maker.redeem_collateral(USER1, Amount::new(1)).unwrap_err();
        assert_eq!(
            err,
            MakerError::InsufficientCollateral {
                requested: Amount::new(1),
                redeemable: Amount::zero(),
            }
        );
        assert_eq!(maker.get_collateral(USER1), tokens(dec!(0.2)));
    }

    #[test]
    fn partial_redeem_after_partial_burn() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(2)).unwrap();
        maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap();

        // locked 0.4, required 0.2
        assert_eq!(maker.get_redeemable_collateral(USER1).unwrap(), tokens(dec!(0.2)));
        assert!(maker.redeem_collateral(USER1, tokens(dec!(0.3))).is_err());
        maker.redeem_collateral(USER1, tokens(dec!(0.2))).unwrap();
        assert_eq!(maker.get_collateral(USER1), tokens(dec!(0.2)));
        assert_eq!(maker.get_required_collateral(USER1).unwrap(), tokens(dec!(0.2)));
    }

    #[test]
    fn redeem_zero_is_invalid() {
        let mut maker = setup();
        let err = maker.redeem_collateral(USER1, Amount::zero()).unwrap_err();
        assert!(matches!(err, MakerError::InvalidInput(_)));
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn scenario_a_price_doubles() {
        let mut maker = setup();
        let result = maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        assert_eq!(result.collateral_debit.raw(), ONE / 5);
        assert_eq!(maker.get_required_collateral(USER1).unwrap().raw(), ONE / 5);
        assert!(maker.get_pnl(USER1).unwrap().is_zero());

        maker.set_price(ORACLE, 2 * PRICE_SCALE).unwrap();
        assert_eq!(maker.get_pnl(USER1).unwrap().raw(), ONE as i128);
        assert!(maker.get_required_collateral(USER1).unwrap().is_zero());
    }

    #[test]
    fn scenario_b_price_halves() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.set_price(ORACLE, PRICE_SCALE / 2).unwrap();

        assert_eq!(maker.get_pnl(USER1).unwrap().raw(), -(ONE as i128) / 2);
        assert_eq!(maker.get_required_collateral(USER1).unwrap().raw(), ONE / 10 * 7);
    }

    #[test]
    fn scenario_c_margin_on_net() {
        let mut maker = setup();
        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.mint_short_tokens(USER1, Amount::tokens(2)).unwrap();

        assert_eq!(maker.get_net_exposure(USER1).unwrap().raw(), -(ONE as i128));
        assert_eq!(maker.get_required_collateral(USER1).unwrap().raw(), ONE / 5);
    }

    #[test]
    fn scenario_d_full_round_trip() {
        let mut maker = setup();
        let before = usd_balance(&maker, USER1);

        maker.mint_long_tokens(USER1, Amount::tokens(1)).unwrap();
        maker.burn_long_tokens(USER1, Amount::tokens(1)).unwrap();
        let locked = maker.get_collateral(USER1);
        maker.redeem_collateral(USER1, locked).unwrap();

        assert!(maker.get_collateral(USER1).is_zero());
        assert_eq!(usd_balance(&maker, USER1), before);
        assert!(maker.pool_collateral_balance().is_zero());
    }
}
