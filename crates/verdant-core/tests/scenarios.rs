//! End-to-end scenarios for the conversion library
//!
//! These cover the split, repayment and exchange contracts as a caller
//! composing the public API sees them.

use verdant_core::prelude::*;

fn cents(text: &str) -> FixedPointAmount {
    FixedPointAmount::parse(text, 2).unwrap()
}

mod split_scenarios {
    use super::*;

    #[test]
    fn test_fee_reward_net_on_one_thousand() {
        let policy = SplitPolicy::from_pairs([("fee", 250), ("reward", 0), ("net", 9_750)]).unwrap();
        let result = compute_split(&cents("1000.00"), &policy).unwrap();

        assert_eq!(result.get("fee").unwrap().to_display_string(), "25.00");
        assert_eq!(result.get("net").unwrap().to_display_string(), "975.00");
        assert_eq!(result.total().unwrap().to_display_string(), "1000.00");
    }

    #[test]
    fn test_split_of_split_keeps_exact_totals() {
        let outer = SplitPolicy::from_pairs([("protocol", 300), ("investors", 9_700)]).unwrap();
        let inner = SplitPolicy::from_pairs([("treasury", 6_667), ("rewards", 3_333)]).unwrap();

        let gross = FixedPointAmount::parse("1234.567891", STABLECOIN_DECIMALS).unwrap();
        let first = compute_split(&gross, &outer).unwrap();
        let protocol = first.get("protocol").unwrap();
        let second = compute_split(&protocol, &inner).unwrap();

        assert_eq!(second.total().unwrap(), protocol);
        assert_eq!(first.total().unwrap(), gross);
    }
}

mod repayment_scenarios {
    use super::*;

    fn fee_policy() -> SplitPolicy {
        SplitPolicy::from_pairs([("fee", 250), ("rest", 9_750)]).unwrap()
    }

    #[test]
    fn test_interest_first_breakdown() {
        let breakdown = RepaymentAllocator::new()
            .allocate(cents("500.00"), cents("5000.00"), cents("50.00"), &fee_policy())
            .unwrap();

        assert_eq!(breakdown.fee.to_display_string(), "12.50");
        assert_eq!(breakdown.interest.to_display_string(), "50.00");
        assert_eq!(breakdown.principal.to_display_string(), "437.50");
        assert_eq!(
            breakdown
                .principal
                .add(&breakdown.interest)
                .unwrap()
                .add(&breakdown.fee)
                .unwrap(),
            breakdown.total_paid
        );
    }

    #[test]
    fn test_overpayment_reports_excess() {
        let err = RepaymentAllocator::new()
            .allocate(cents("6000.00"), cents("5000.00"), cents("50.00"), &fee_policy())
            .unwrap_err();

        // fee 150.00 + interest 50.00 + principal 5000.00 = 5200.00
        assert_eq!(err.overpayment_excess(), Some(cents("800.00")));
        assert_eq!(err.code(), 2006);
    }

    #[test]
    fn test_accrue_then_repay_in_full() {
        let principal = cents("1000.00");
        let interest = accrue_simple_interest(&principal, 730, 50).unwrap();
        assert_eq!(interest.to_display_string(), "10.00");

        let no_fee = SplitPolicy::from_pairs([("fee", 0), ("rest", 10_000)]).unwrap();
        let breakdown = RepaymentAllocator::new()
            .allocate(cents("1010.00"), principal, interest, &no_fee)
            .unwrap();
        assert_eq!(breakdown.principal, principal);
        assert_eq!(breakdown.interest, interest);
    }
}

mod exchange_scenarios {
    use super::*;

    #[test]
    fn test_quote_then_distribute_reward_pool() {
        let policy = SplitPolicy::from_pairs([("fee", 200), ("reward", 800), ("net", 9_000)]).unwrap();
        let credits = FixedPointAmount::parse("125.750", CREDIT_DECIMALS).unwrap();
        let rate = FixedPointAmount::parse("18.25", STABLECOIN_DECIMALS).unwrap();

        let quote = ExchangeConverter::default().quote(credits, rate, &policy).unwrap();
        assert_eq!(quote.gross_payout.to_display_string(), "2294.937500");

        let reward = quote.share("reward").unwrap();
        let payouts = distribute_pro_rata(&reward, &[("lp-a", 5_000u128), ("lp-b", 2_500), ("lp-c", 2_500)])
            .unwrap();
        assert_eq!(payouts.total().unwrap(), reward);
    }
}
