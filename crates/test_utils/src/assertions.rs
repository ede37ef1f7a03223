//! Custom Test Assertions
//!
//! Assertion helpers for money and document totals that report every
//! mismatching figure at once.

use core_kernel::Money;
use domain_billing::{BalanceSummary, Totals};
use domain_shop::{Estimate, Ticket};
use rust_decimal::Decimal;

/// Asserts a Money value equals an exact decimal amount
pub fn assert_money_eq(actual: Money, expected: Decimal) {
    assert_eq!(
        actual.amount(),
        expected,
        "Money mismatch: actual={}, expected={}",
        actual.amount(),
        expected
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

/// Asserts the pieces add up to a total
pub fn assert_money_sum_equals(parts: &[Money], expected_total: Money) {
    let sum: Money = parts.iter().sum();
    assert_eq!(
        sum, expected_total,
        "Sum of parts ({}) doesn't equal expected total ({})",
        sum, expected_total
    );
}

fn check_figures(label: &str, actual: [Money; 3], expected: [Decimal; 3]) {
    let actual = actual.map(|m| m.amount());
    assert_eq!(
        actual, expected,
        "{} totals mismatch (subtotal, tax, total): actual={:?}, expected={:?}",
        label, actual, expected
    );
}

/// Asserts computed totals, and that the total is subtotal plus tax
pub fn assert_totals(totals: &Totals, subtotal: Decimal, tax: Decimal, total: Decimal) {
    check_figures(
        "Computed",
        [totals.subtotal, totals.tax_amount, totals.total],
        [subtotal, tax, total],
    );
    assert_money_sum_equals(&[totals.subtotal, totals.tax_amount], totals.total);
}

/// Asserts the totals stored on a ticket
pub fn assert_ticket_totals(ticket: &Ticket, subtotal: Decimal, tax: Decimal, total: Decimal) {
    check_figures(
        "Ticket",
        [ticket.subtotal, ticket.tax_amount, ticket.total],
        [subtotal, tax, total],
    );
}

/// Asserts the totals stored on an estimate
pub fn assert_estimate_totals(estimate: &Estimate, subtotal: Decimal, tax: Decimal, total: Decimal) {
    check_figures(
        "Estimate",
        [estimate.subtotal, estimate.tax_amount, estimate.total],
        [subtotal, tax, total],
    );
}

/// Asserts the paid amount and balance due of a ticket
pub fn assert_balance(summary: &BalanceSummary, paid: Decimal, due: Decimal) {
    assert_eq!(
        (summary.amount_paid.amount(), summary.balance_due.amount()),
        (paid, due),
        "Balance mismatch (paid, due) for total {}",
        summary.total
    );
}

/// Asserts that a result is an error and returns it
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        match $result {
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => e,
        }
    };
}

/// Asserts that an error matches a specific variant
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(value) => panic!("Expected Err matching {}, got Ok({:?})", stringify!($pattern), value),
            Err(ref e) => {
                assert!(
                    matches!(e, $pattern),
                    "Error {:?} does not match pattern {}",
                    e,
                    stringify!($pattern)
                );
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_assert_money_eq_ignores_scale() {
        assert_money_eq(Money::new(dec!(150)), dec!(150.00));
    }

    #[test]
    #[should_panic(expected = "Money mismatch")]
    fn test_assert_money_eq_fails() {
        assert_money_eq(Money::new(dec!(14.63)), dec!(14.62));
    }

    #[test]
    fn test_assert_money_sum_equals() {
        let parts = [Money::new(dec!(150.00)), Money::new(dec!(14.62))];
        assert_money_sum_equals(&parts, Money::new(dec!(164.62)));
    }

    #[test]
    fn test_assert_balance() {
        let summary = BalanceSummary::new(Money::new(dec!(164.62)), [Money::new(dec!(100))]);
        assert_balance(&summary, dec!(100), dec!(64.62));
    }

    #[test]
    fn test_assert_err_variant() {
        let result: Result<(), domain_shop::ShopError> =
            Err(domain_shop::ShopError::Validation("bad".to_string()));
        assert_err_variant!(result, domain_shop::ShopError::Validation(_));
    }
}
