use rust_decimal::Decimal;
use std::path::Path;

use super::entities::Invoice;
use super::errors::InvoiceError;

/// Source of the allowed invoice types, allowed tax rates and the currency
/// label. Consulted when an invoice is built and when it is exported.
pub trait InvoiceSettings: Send + Sync {
  fn allowed_invoice_types(&self) -> &[String];
  fn allowed_tax_rates(&self) -> &[Decimal];
  fn currency_label(&self) -> &str;

  fn is_allowed_invoice_type(&self, invoice_type: &str) -> bool {
    self
      .allowed_invoice_types()
      .iter()
      .any(|allowed| allowed == invoice_type)
  }

  fn is_allowed_tax_rate(&self, rate: Decimal) -> bool {
    self.allowed_tax_rates().contains(&rate)
  }
}

/// Writes a finished invoice document to `path`.
pub trait DocumentRenderer: Send + Sync {
  fn render_to_file(
    &self,
    invoice: &Invoice,
    currency: &str,
    path: &Path,
  ) -> Result<(), InvoiceError>;
}

/// Settings held in memory, for embedding and tests.
#[derive(Debug, Clone)]
pub struct StaticSettings {
  invoice_types: Vec<String>,
  tax_rates: Vec<Decimal>,
  currency: String,
}

impl StaticSettings {
  pub fn new(invoice_types: Vec<String>, tax_rates: Vec<Decimal>, currency: &str) -> Self {
    Self {
      invoice_types,
      tax_rates,
      currency: currency.to_string(),
    }
  }
}

impl InvoiceSettings for StaticSettings {
  fn allowed_invoice_types(&self) -> &[String] {
    &self.invoice_types
  }

  fn allowed_tax_rates(&self) -> &[Decimal] {
    &self.tax_rates
  }

  fn currency_label(&self) -> &str {
    &self.currency
  }
}
