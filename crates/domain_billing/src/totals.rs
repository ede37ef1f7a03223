//! Ticket and estimate totals
//!
//! Totals are always recomputed from the full set of current lines. Nothing
//! previously stored on the document is read, so recomputing an unchanged set
//! gives the same answer every time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use core_kernel::Money;
use crate::error::BillingError;
use crate::line::BillableLine;
use crate::tax::{DocumentKind, TaxProfile, TaxScenario, LOUISIANA_SALES_TAX};

/// Computed financial fields for a ticket or estimate
///
/// `subtotal`, `tax_amount` and `total` are rounded to the cent and are what
/// gets stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
    /// Unrounded sum of the lines the tax was applied to
    pub taxable_base: Money,
    pub scenario: TaxScenario,
}

/// Computes subtotal, tax and total for a repair ticket
///
/// # Errors
///
/// Returns `BillingError::InvalidInput` if any line amount is negative.
pub fn compute_ticket_totals(
    customer: &TaxProfile,
    lines: &[BillableLine],
) -> Result<Totals, BillingError> {
    compute(DocumentKind::Ticket, customer, lines)
}

/// Computes subtotal, tax and total for an estimate
///
/// Same rules as tickets except the out-of-state engine scenario never
/// applies; only a valid exemption changes the tax.
///
/// # Errors
///
/// Returns `BillingError::InvalidInput` if any line amount is negative.
pub fn compute_estimate_totals(
    customer: &TaxProfile,
    lines: &[BillableLine],
) -> Result<Totals, BillingError> {
    compute(DocumentKind::Estimate, customer, lines)
}

fn compute(
    kind: DocumentKind,
    customer: &TaxProfile,
    lines: &[BillableLine],
) -> Result<Totals, BillingError> {
    for (position, line) in lines.iter().enumerate() {
        line.validate(position)?;
    }

    let subtotal = lines.iter().map(|l| l.amount).sum::<Money>().round_to_cents();
    let scenario = TaxScenario::determine(customer, kind, lines);
    let taxable_base = scenario.taxable_base(lines);
    let tax_amount = LOUISIANA_SALES_TAX.apply(&taxable_base).round_to_cents();
    let total = (subtotal + tax_amount).round_to_cents();

    debug!(
        ?kind,
        ?scenario,
        line_count = lines.len(),
        subtotal = %subtotal,
        tax = %tax_amount,
        total = %total,
        "Computed document totals"
    );

    Ok(Totals {
        subtotal,
        tax_amount,
        total,
        taxable_base,
        scenario,
    })
}
