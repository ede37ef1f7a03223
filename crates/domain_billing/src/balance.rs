//! Balance due across partial deposits

use serde::{Deserialize, Serialize};

use core_kernel::Money;

/// Ticket total minus everything deposited so far, rounded to the cent
///
/// The result is not clamped: an overpaid ticket has a negative balance.
pub fn compute_balance_due<I>(ticket_total: Money, deposits: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    let paid: Money = deposits.into_iter().sum();
    (ticket_total - paid).round_to_cents()
}

/// Payment position of a ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub total: Money,
    pub amount_paid: Money,
    pub balance_due: Money,
}

impl BalanceSummary {
    pub fn new<I>(ticket_total: Money, deposits: I) -> Self
    where
        I: IntoIterator<Item = Money>,
    {
        let amount_paid: Money = deposits.into_iter().sum::<Money>().round_to_cents();
        Self {
            total: ticket_total,
            amount_paid,
            balance_due: compute_balance_due(ticket_total, [amount_paid]),
        }
    }

    pub fn is_settled(&self) -> bool {
        !self.balance_due.is_positive()
    }

    pub fn is_overpaid(&self) -> bool {
        self.balance_due.is_negative()
    }
}
