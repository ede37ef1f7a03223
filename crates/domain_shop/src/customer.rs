//! Customer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::CustomerId;
use domain_billing::TaxProfile;

/// A shop customer
///
/// `tax_exempt` and `tax_exempt_certificate` are stored exactly as entered.
/// Whether they amount to an exemption is decided by [`Customer::tax_profile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub tax_exempt: bool,
    pub tax_exempt_certificate: Option<String>,
    pub out_of_state: bool,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CustomerId::new_v7(),
            name: name.into(),
            phone: None,
            email: None,
            address: None,
            tax_exempt: false,
            tax_exempt_certificate: None,
            out_of_state: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Marks the customer exempt with the given certificate number
    pub fn with_exemption(mut self, certificate: impl Into<String>) -> Self {
        self.tax_exempt = true;
        self.tax_exempt_certificate = Some(certificate.into());
        self
    }

    pub fn with_out_of_state(mut self, out_of_state: bool) -> Self {
        self.out_of_state = out_of_state;
        self
    }

    /// Reduces the stored flags to what the billing engine needs
    pub fn tax_profile(&self) -> TaxProfile {
        TaxProfile::from_flags(
            self.tax_exempt,
            self.tax_exempt_certificate.as_deref(),
            self.out_of_state,
        )
    }

    /// Exempt flag set but no usable certificate on file
    pub fn has_unsupported_exemption_claim(&self) -> bool {
        self.tax_exempt && !self.tax_profile().is_exempt()
    }
}
