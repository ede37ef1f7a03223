//! Property-Based Test Generators
//!
//! Proptest strategies for shop data that respect domain invariants:
//! prices are non-negative whole cents and quantities are at least one.

use core_kernel::Money;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Non-negative prices up to $10,000.00
pub fn price_strategy() -> impl Strategy<Value = Money> {
    (0i64..1_000_000i64).prop_map(Money::from_cents)
}

/// Strictly positive amounts up to $5,000.00, suitable for deposits
pub fn positive_money_strategy() -> impl Strategy<Value = Money> {
    (1i64..500_000i64).prop_map(Money::from_cents)
}

/// Part quantities
pub fn quantity_strategy() -> impl Strategy<Value = u32> {
    1u32..20u32
}

/// Labor hours in quarter-hour steps, 0.25 to 12.00
pub fn hours_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=48i64).prop_map(|quarters| Decimal::new(quarters * 25, 2))
}

/// A ticket part line: price, quantity, and whether it is taxable
pub fn part_line_strategy() -> impl Strategy<Value = (Money, u32, bool)> {
    (price_strategy(), quantity_strategy(), any::<bool>())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_prices_are_whole_cents(price in price_strategy()) {
            prop_assert!(!price.is_negative());
            prop_assert_eq!(price.round_to_cents(), price);
        }

        #[test]
        fn prop_hours_are_positive(hours in hours_strategy()) {
            prop_assert!(hours > Decimal::ZERO);
            prop_assert!(hours <= Decimal::new(12, 0));
        }
    }
}
