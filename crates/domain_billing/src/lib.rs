//! Billing Domain - Ticket and Estimate Totals
//!
//! This crate is the pure computation core of the shop: given a customer's tax
//! profile and a document's billable lines it produces the subtotal, sales tax
//! and total that get stored on the ticket or estimate, and given a ticket's
//! deposits it produces the balance due.
//!
//! # Tax Scenarios
//!
//! Louisiana sales tax is a flat 9.75%. Which lines it applies to depends on
//! the customer:
//!
//! - **Exempt**: the customer is flagged exempt *and* has a certificate on
//!   file. Nothing is taxed.
//! - **Out-of-state engine sale**: the customer is out of state and the ticket
//!   carries a new engine sale. The engine is untaxed; taxable parts and labor
//!   on the same ticket are taxed.
//! - **Standard**: every line flagged taxable is taxed.
//!
//! Estimates never carry an engine sale, so for estimates the out-of-state
//! flag has no effect.
//!
//! # Example
//!
//! ```rust
//! use domain_billing::{compute_ticket_totals, BillableLine, TaxProfile};
//! use core_kernel::Money;
//! use rust_decimal_macros::dec;
//!
//! let lines = vec![
//!     BillableLine::part(dec!(2), Money::new(dec!(15.99)), true),
//!     BillableLine::labor(dec!(1.5), Money::new(dec!(100))),
//! ];
//! let totals = compute_ticket_totals(&TaxProfile::standard(), &lines).unwrap();
//! assert_eq!(totals.subtotal.amount(), dec!(181.98));
//! ```
//!
//! Nothing here touches storage. Callers fetch the current lines, call the
//! engine, and write the result back.

pub mod line;
pub mod tax;
pub mod totals;
pub mod balance;
pub mod error;

pub use line::{BillableLine, LineCategory};
pub use tax::{
    ExemptionCertificate, TaxProfile, TaxScenario, DocumentKind, LOUISIANA_SALES_TAX,
};
pub use totals::{Totals, compute_ticket_totals, compute_estimate_totals};
pub use balance::{BalanceSummary, compute_balance_due};
pub use error::BillingError;
