//! Unit tests for the Money module
//!
//! Tests cover creation, arithmetic, half-up cent rounding and display.

use core_kernel::{Money, MoneyError, Rate};
use rust_decimal_macros::dec;

mod creation {
    use super::*;

    #[test]
    fn test_new_keeps_exact_amount() {
        let m = Money::new(dec!(106.40625));
        assert_eq!(m.amount(), dec!(106.40625));
    }

    #[test]
    fn test_from_cents() {
        assert_eq!(Money::from_cents(5488).amount(), dec!(54.88));
        assert_eq!(Money::from_cents(-1).amount(), dec!(-0.01));
    }

    #[test]
    fn test_zero() {
        assert!(Money::zero().is_zero());
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
    }

    #[test]
    fn test_try_from_f64() {
        assert_eq!(Money::try_from_f64(8.5).unwrap().amount(), dec!(8.5));
        assert_eq!(Money::try_from_f64(f64::NEG_INFINITY), Err(MoneyError::NonFinite));
    }
}

mod arithmetic {
    use super::*;

    #[test]
    fn test_add_sub_neg() {
        let a = Money::new(dec!(100.00));
        let b = Money::new(dec!(150.25));
        assert_eq!((a + b).amount(), dec!(250.25));
        assert_eq!((a - b).amount(), dec!(-50.25));
        assert!((a - b).is_negative());
        assert_eq!((-a).amount(), dec!(-100.00));
    }

    #[test]
    fn test_multiply_by_quantity() {
        let unit = Money::new(dec!(15.99));
        assert_eq!((unit * dec!(3)).amount(), dec!(47.97));
    }

    #[test]
    fn test_sum() {
        let items = vec![Money::new(dec!(1.10)), Money::new(dec!(2.20)), Money::new(dec!(3.30))];
        let total: Money = items.iter().sum();
        assert_eq!(total.amount(), dec!(6.60));
        let empty: Vec<Money> = Vec::new();
        assert!(empty.into_iter().sum::<Money>().is_zero());
    }
}

mod rounding {
    use super::*;

    #[test]
    fn test_half_up_not_bankers() {
        assert_eq!(Money::new(dec!(0.125)).round_to_cents().amount(), dec!(0.13));
        assert_eq!(Money::new(dec!(0.135)).round_to_cents().amount(), dec!(0.14));
    }

    #[test]
    fn test_negative_midpoint_rounds_away_from_zero() {
        assert_eq!(Money::new(dec!(-0.125)).round_to_cents().amount(), dec!(-0.13));
    }

    #[test]
    fn test_below_midpoint_rounds_down() {
        assert_eq!(Money::new(dec!(14.620125)).round_to_cents().amount(), dec!(14.62));
    }
}

mod rate {
    use super::*;

    #[test]
    fn test_rate_from_percentage() {
        let rate = Rate::from_percentage(dec!(9.75));
        assert_eq!(rate.as_decimal(), dec!(0.0975));
        assert_eq!(rate.as_percentage(), dec!(9.75));
    }

    #[test]
    fn test_rate_apply_is_unrounded() {
        let rate = Rate::new(dec!(0.0975));
        assert_eq!(rate.apply(&Money::new(dec!(150))).amount(), dec!(14.625));
    }
}

mod display {
    use super::*;

    #[test]
    fn test_display_two_places() {
        assert_eq!(Money::new(dec!(150)).to_string(), "$150.00");
        assert_eq!(Money::new(dec!(0.005)).to_string(), "$0.01");
        assert_eq!(Money::new(dec!(-12.5)).to_string(), "-$12.50");
    }
}
