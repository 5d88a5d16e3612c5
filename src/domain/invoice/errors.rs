use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Wrong invoice type: {0}")]
  InvalidInvoiceType(String),

  #[error("Wrong tax rate {rate} at line {index}")]
  InvalidTaxRate { index: usize, rate: Decimal },

  #[error("Negative net amount {amount} at line {index}")]
  NegativeNetPrice { index: usize, amount: Decimal },

  #[error(
    "Line count mismatch: {positions} positions, {prices} net prices, {rates} tax rates"
  )]
  LineCountMismatch {
    positions: usize,
    prices: usize,
    rates: usize,
  },

  #[error("Amount out of range at line {index}")]
  AmountOverflow { index: usize },

  #[error("Failed to write document {}: {source}", .path.display())]
  DocumentWrite {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to encode document: {0}")]
  DocumentEncoding(String),
}
