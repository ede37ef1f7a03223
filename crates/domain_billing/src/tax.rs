//! Sales tax rules
//!
//! A customer's stored flags are reduced to a [`TaxProfile`] before they reach
//! the engine. The exemption rule is defined only on a certificate that is
//! present and non-blank: a customer flagged exempt with nothing on file is
//! taxed like anyone else.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use core_kernel::{Money, Rate};
use crate::line::{BillableLine, LineCategory};

/// Louisiana combined sales tax, 9.75%
pub const LOUISIANA_SALES_TAX: Rate = Rate::new(dec!(0.0975));

/// A tax exemption certificate number known to be non-blank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExemptionCertificate(String);

impl ExemptionCertificate {
    /// Returns `None` when the certificate text is empty or whitespace
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        let trimmed = number.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExemptionCertificate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "exemption certificate cannot be blank".to_string())
    }
}

impl From<ExemptionCertificate> for String {
    fn from(cert: ExemptionCertificate) -> Self {
        cert.0
    }
}

/// The tax-relevant facts about a customer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxProfile {
    /// A valid exemption; `Some` means the customer is fully exempt
    pub exemption: Option<ExemptionCertificate>,
    /// Customer resides outside the taxing jurisdiction
    pub out_of_state: bool,
}

impl TaxProfile {
    /// An in-state customer with no exemption
    pub fn standard() -> Self {
        Self::default()
    }

    pub fn exempt(certificate: ExemptionCertificate) -> Self {
        Self {
            exemption: Some(certificate),
            out_of_state: false,
        }
    }

    pub fn out_of_state() -> Self {
        Self {
            exemption: None,
            out_of_state: true,
        }
    }

    /// Builds a profile from the flags a customer record stores
    ///
    /// The exemption only takes effect when `tax_exempt` is set and the
    /// certificate is present and non-blank.
    pub fn from_flags(tax_exempt: bool, certificate: Option<&str>, out_of_state: bool) -> Self {
        let exemption = if tax_exempt {
            certificate.and_then(ExemptionCertificate::new)
        } else {
            None
        };
        Self { exemption, out_of_state }
    }

    pub fn is_exempt(&self) -> bool {
        self.exemption.is_some()
    }
}

/// Which rule set decided the taxable base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxScenario {
    Exempt,
    OutOfStateEngineSale,
    Standard,
}

/// The kind of document being totalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Ticket,
    Estimate,
}

impl TaxScenario {
    /// Picks the scenario for a document
    pub fn determine(profile: &TaxProfile, kind: DocumentKind, lines: &[BillableLine]) -> Self {
        if profile.is_exempt() {
            return TaxScenario::Exempt;
        }
        let has_engine_sale = lines.iter().any(BillableLine::is_engine_sale);
        match kind {
            DocumentKind::Ticket if profile.out_of_state && has_engine_sale => {
                TaxScenario::OutOfStateEngineSale
            }
            _ => TaxScenario::Standard,
        }
    }

    /// Sums the lines this scenario taxes
    pub fn taxable_base(&self, lines: &[BillableLine]) -> Money {
        match self {
            TaxScenario::Exempt => Money::zero(),
            TaxScenario::OutOfStateEngineSale => lines
                .iter()
                .filter(|l| l.taxable)
                .filter(|l| matches!(l.category, LineCategory::Part | LineCategory::Labor))
                .map(|l| l.amount)
                .sum(),
            TaxScenario::Standard => lines
                .iter()
                .filter(|l| l.taxable)
                .map(|l| l.amount)
                .sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_certificate_is_not_an_exemption() {
        assert!(ExemptionCertificate::new("   ").is_none());
        assert!(!TaxProfile::from_flags(true, Some(""), false).is_exempt());
        assert!(!TaxProfile::from_flags(true, None, false).is_exempt());
    }

    #[test]
    fn test_certificate_without_flag_is_not_an_exemption() {
        assert!(!TaxProfile::from_flags(false, Some("TX123"), false).is_exempt());
    }

    #[test]
    fn test_flag_and_certificate_exempt() {
        let profile = TaxProfile::from_flags(true, Some(" TX123 "), false);
        assert_eq!(profile.exemption.as_ref().map(|c| c.as_str()), Some("TX123"));
    }

    #[test]
    fn test_estimate_never_uses_engine_scenario() {
        let lines = vec![BillableLine::new_engine_sale(Money::new(dec!(5000)))];
        let profile = TaxProfile::out_of_state();
        assert_eq!(
            TaxScenario::determine(&profile, DocumentKind::Ticket, &lines),
            TaxScenario::OutOfStateEngineSale
        );
        assert_eq!(
            TaxScenario::determine(&profile, DocumentKind::Estimate, &lines),
            TaxScenario::Standard
        );
    }

    #[test]
    fn test_certificate_serde_rejects_blank() {
        let err = serde_json::from_str::<ExemptionCertificate>("\"  \"");
        assert!(err.is_err());
    }
}
