//! Record validation rules
//!
//! # Customers
//! - Name is required
//! - Phone, when given, must contain exactly 10 digits; it is stored as `(555)123-4567`
//! - Email, when given, must be a plausible address
//! - Exempt flag without a certificate is accepted with a warning (the
//!   customer is taxed)
//!
//! # Engines
//! - Serial number is required and limited to letters, digits, `-` and `_`
//!
//! # Parts and mechanics
//! - Prices and rates cannot be negative

use validator::ValidateEmail;

use core_kernel::Money;
use crate::customer::Customer;
use crate::error::ShopError;
use crate::inventory::{Mechanic, Part};

/// Result of record validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    /// Non-fatal issues
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Converts into an error listing every problem found
    pub fn into_result(self) -> Result<Vec<String>, ShopError> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(ShopError::validation(self.errors.join("; ")))
        }
    }
}

/// Normalises a 10-digit phone number to `(555)123-4567`
///
/// Blank input yields `Ok(None)`.
pub fn normalize_phone(phone: &str) -> Result<Option<String>, String> {
    if phone.trim().is_empty() {
        return Ok(None);
    }
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return Err("Phone number must be 10 digits (e.g., 555-123-4567)".to_string());
    }
    Ok(Some(format!("({}){}-{}", &digits[0..3], &digits[3..6], &digits[6..10])))
}

/// Blank emails are accepted
pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err("Invalid email format (e.g., user@example.com)".to_string())
    }
}

pub fn validate_serial_number(serial: &str) -> Result<(), String> {
    let serial = serial.trim();
    if serial.is_empty() {
        return Err("Serial number is required".to_string());
    }
    if serial
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err("Serial number can only contain letters, numbers, dashes, and underscores".to_string())
    }
}

fn check_non_negative(result: &mut ValidationResult, value: Option<Money>, field: &str) {
    if value.is_some_and(|m| m.is_negative()) {
        result.add_error(format!("{} cannot be negative", field));
    }
}

/// Validator for customer records
pub struct CustomerValidator;

impl CustomerValidator {
    /// Validates a customer, normalising the phone number in place
    pub fn validate(customer: &mut Customer) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if customer.name.trim().is_empty() {
            result.add_error("Name is required");
        }

        if let Some(phone) = customer.phone.as_deref() {
            match normalize_phone(phone) {
                Ok(normalized) => customer.phone = normalized,
                Err(e) => result.add_error(e),
            }
        }

        if let Some(email) = customer.email.as_deref() {
            if let Err(e) = validate_email(email) {
                result.add_error(e);
            }
        }

        if customer.has_unsupported_exemption_claim() {
            result.add_warning("Customer is flagged tax exempt but has no certificate on file; sales will be taxed");
        }

        result
    }
}

/// Validator for inventory records
pub struct InventoryValidator;

impl InventoryValidator {
    pub fn validate_part(part: &Part) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if part.name.trim().is_empty() {
            result.add_error("Part name is required");
        }
        if part.stock_quantity < 0 {
            result.add_error("Stock quantity cannot be negative");
        }
        check_non_negative(&mut result, Some(part.price), "Price");
        check_non_negative(&mut result, part.cost_from_supplier, "Supplier cost");
        check_non_negative(&mut result, part.retail_price, "Retail price");
        result
    }

    pub fn validate_mechanic(mechanic: &Mechanic) -> ValidationResult {
        let mut result = ValidationResult::ok();
        if mechanic.name.trim().is_empty() {
            result.add_error("Mechanic name is required");
        }
        check_non_negative(&mut result, mechanic.hourly_rate, "Hourly rate");
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_phone_normalisation() {
        assert_eq!(normalize_phone("555-123-4567").unwrap().as_deref(), Some("(555)123-4567"));
        assert_eq!(normalize_phone("(555) 123 4567").unwrap().as_deref(), Some("(555)123-4567"));
        assert_eq!(normalize_phone("  ").unwrap(), None);
        assert!(normalize_phone("123-4567").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("captain@cajunmarine.com").is_ok());
        assert!(validate_email("").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_serial_number() {
        assert!(validate_serial_number("SN-12345_A").is_ok());
        assert!(validate_serial_number("").is_err());
        assert!(validate_serial_number("SN 123").is_err());
        assert!(validate_serial_number("SN#123").is_err());
    }

    #[test]
    fn test_customer_validation_collects_errors() {
        let mut customer = Customer::new(" ").with_phone("12").with_email("bad");
        let result = CustomerValidator::validate(&mut customer);
        assert_eq!(result.errors.len(), 3);
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_exempt_without_certificate_warns() {
        let mut customer = Customer::new("Bayou Charters").with_phone("5559999999");
        customer.tax_exempt = true;
        let result = CustomerValidator::validate(&mut customer);
        assert!(result.is_valid());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(customer.phone.as_deref(), Some("(555)999-9999"));
    }

    #[test]
    fn test_negative_part_price() {
        let part = Part::new("Manual", Money::new(dec!(-1)));
        assert!(!InventoryValidator::validate_part(&part).is_valid());
    }
}
