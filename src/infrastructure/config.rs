use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::domain::invoice::InvoiceSettings;

fn default_output_dir() -> String {
  ".".to_string()
}

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub invoice: InvoiceConfig,
  #[serde(default)]
  pub pdf: PdfConfig,
}

/// Allowed invoice types and tax rates, plus the currency printed on totals
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceConfig {
  pub types: Vec<String>,
  pub tax_rates: Vec<Decimal>,
  pub currency: String,
}

/// PDF export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PdfConfig {
  #[serde(default = "default_output_dir")]
  pub output_dir: String,
}

impl Default for PdfConfig {
  fn default() -> Self {
    Self {
      output_dir: default_output_dir(),
    }
  }
}

impl PdfConfig {
  pub fn output_path(&self) -> PathBuf {
    PathBuf::from(&self.output_dir)
  }
}

impl InvoiceSettings for InvoiceConfig {
  fn allowed_invoice_types(&self) -> &[String] {
    &self.types
  }

  fn allowed_tax_rates(&self) -> &[Decimal] {
    &self.tax_rates
  }

  fn currency_label(&self) -> &str {
    &self.currency
  }
}

impl Config {
  /// Load configuration from files and environment variables
  ///
  /// Configuration is loaded in the following order (later sources override earlier ones):
  /// 1. config/default.toml
  /// 2. config/local.toml (if exists)
  /// 3. config/{RUN_MODE}.toml (if exists, RUN_MODE defaults to "development")
  /// 4. Environment variables with INVOICEGEN_ prefix
  ///
  /// # Environment Variables
  ///
  /// Environment variables use the INVOICEGEN_ prefix and are separated by double underscores:
  /// - `INVOICEGEN_INVOICE__CURRENCY=EUR`
  /// - `INVOICEGEN_PDF__OUTPUT_DIR=./out`
  ///
  /// # Errors
  ///
  /// Returns a `ConfigError` if `config/default.toml` is missing or invalid,
  /// or if a required value is absent or has the wrong type.
  pub fn load() -> Result<Self, ConfigError> {
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = ConfigBuilder::builder()
      .add_source(File::with_name("config/default").required(true))
      .add_source(File::with_name("config/local").required(false))
      .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
      .add_source(
        Environment::with_prefix("INVOICEGEN")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?;

    config.try_deserialize()
  }

  /// Load configuration from an in-memory TOML document, without the
  /// file and environment layers.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    ConfigBuilder::builder()
      .add_source(File::from_str(source, FileFormat::Toml))
      .build()?
      .try_deserialize()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  const SAMPLE: &str = r#"
    [invoice]
    types = ["sales", "proforma"]
    tax_rates = [0.0, 0.08, 0.23]
    currency = "PLN"
  "#;

  #[test]
  fn test_config_structure() {
    let config: Config = toml::from_str(SAMPLE).expect("Failed to parse config");

    assert_eq!(config.invoice.types, vec!["sales", "proforma"]);
    assert_eq!(config.invoice.tax_rates, vec![dec!(0), dec!(0.08), dec!(0.23)]);
    assert_eq!(config.invoice.currency, "PLN");
    assert_eq!(config.pdf.output_dir, "."); // default
  }

  #[test]
  fn test_from_toml_str_implements_settings() {
    let config = Config::from_toml_str(SAMPLE).expect("Failed to build config");
    let settings: &dyn InvoiceSettings = &config.invoice;

    assert!(settings.is_allowed_invoice_type("sales"));
    assert!(!settings.is_allowed_invoice_type("rental"));
    assert!(settings.is_allowed_tax_rate(dec!(0.23)));
    assert!(!settings.is_allowed_tax_rate(dec!(0.99)));
    assert_eq!(settings.currency_label(), "PLN");
  }

  #[test]
  fn test_pdf_output_dir_override() {
    let source = format!("{}\n[pdf]\noutput_dir = \"./invoices\"\n", SAMPLE);
    let config = Config::from_toml_str(&source).expect("Failed to build config");

    assert_eq!(config.pdf.output_path(), PathBuf::from("./invoices"));
  }

  #[test]
  fn test_missing_invoice_section_is_an_error() {
    assert!(Config::from_toml_str("[pdf]\noutput_dir = \"x\"\n").is_err());
  }
}
