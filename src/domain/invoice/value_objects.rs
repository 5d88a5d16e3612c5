use rust_decimal::Decimal;
use std::fmt;

use super::ports::InvoiceSettings;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid invoice type: {0}")]
  InvalidInvoiceType(String),
  #[error("Invalid tax rate: {0}")]
  InvalidTaxRate(Decimal),
  #[error("Invalid net amount: {0}")]
  InvalidNetAmount(Decimal),
}

// Invoice Type - one of the configured categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceType(String);

impl InvoiceType {
  pub fn new(value: String, settings: &dyn InvoiceSettings) -> Result<Self, ValueObjectError> {
    if !settings.is_allowed_invoice_type(&value) {
      return Err(ValueObjectError::InvalidInvoiceType(value));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  /// Upper-cased form used in document titles.
  pub fn title(&self) -> String {
    format!("{} INVOICE", self.0.to_uppercase())
  }

  /// Spaces replaced by underscores, for use in file names.
  pub fn file_stem(&self) -> String {
    self.0.replace(' ', "_")
  }
}

impl fmt::Display for InvoiceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Tax Rate - fraction of the net amount, e.g. 0.23
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxRate(Decimal);

impl TaxRate {
  pub fn new(value: Decimal, settings: &dyn InvoiceSettings) -> Result<Self, ValueObjectError> {
    if !settings.is_allowed_tax_rate(value) {
      return Err(ValueObjectError::InvalidTaxRate(value));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }

  /// `1 + rate`, or `None` on overflow.
  pub fn as_multiplier(&self) -> Option<Decimal> {
    Decimal::ONE.checked_add(self.0)
  }

  /// Gross amount for `net`, or `None` on overflow.
  pub fn apply(&self, net: Decimal) -> Option<Decimal> {
    net.checked_mul(self.as_multiplier()?)
  }
}

impl fmt::Display for TaxRate {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// Net Amount - price before tax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetAmount(Decimal);

impl NetAmount {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value.is_sign_negative() && !value.is_zero() {
      return Err(ValueObjectError::InvalidNetAmount(value));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}
