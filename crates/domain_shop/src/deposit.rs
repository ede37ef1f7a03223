//! Deposits and payments taken against a ticket

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{DepositId, Money, TicketId};
use crate::error::ShopError;

/// How a deposit was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Check,
    CreditCard,
    DebitCard,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Check => "Check",
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::DebitCard => "Debit Card",
            PaymentMethod::Other => "Other",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "Check" => Ok(PaymentMethod::Check),
            "Credit Card" => Ok(PaymentMethod::CreditCard),
            "Debit Card" => Ok(PaymentMethod::DebitCard),
            "Other" => Ok(PaymentMethod::Other),
            other => Err(ShopError::validation(format!("unknown payment method '{}'", other))),
        }
    }
}

/// A partial or full payment on a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: DepositId,
    pub ticket_id: TicketId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
}

impl Deposit {
    pub fn new(ticket_id: TicketId, amount: Money, payment_date: NaiveDate) -> Self {
        Self {
            id: DepositId::new_v7(),
            ticket_id,
            amount,
            payment_date,
            payment_method: None,
            notes: None,
        }
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
