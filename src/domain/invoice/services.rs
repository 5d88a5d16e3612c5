use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;

use super::entities::{Invoice, InvoiceData};
use super::errors::InvoiceError;
use super::ports::{DocumentRenderer, InvoiceSettings};
use super::value_objects::InvoiceType;

/// `<type with underscores>_invoice_<YYYYMMDD>.pdf`
pub fn document_file_name(invoice_type: &InvoiceType, date: NaiveDate) -> String {
  format!(
    "{}_invoice_{}.pdf",
    invoice_type.file_stem(),
    date.format("%Y%m%d")
  )
}

pub struct InvoiceService {
  settings: Arc<dyn InvoiceSettings>,
  renderer: Arc<dyn DocumentRenderer>,
  output_dir: PathBuf,
}

impl InvoiceService {
  pub fn new(
    settings: Arc<dyn InvoiceSettings>,
    renderer: Arc<dyn DocumentRenderer>,
    output_dir: PathBuf,
  ) -> Self {
    Self {
      settings,
      renderer,
      output_dir,
    }
  }

  pub fn settings(&self) -> &dyn InvoiceSettings {
    self.settings.as_ref()
  }

  pub fn create_invoice(&self, data: InvoiceData) -> Result<Invoice, InvoiceError> {
    Invoice::new(data, self.settings.as_ref())
  }

  /// Exports under today's local date. Same type on the same day overwrites.
  pub fn export_invoice(&self, invoice: &Invoice) -> Result<PathBuf, InvoiceError> {
    self.export_invoice_on(invoice, Local::now().date_naive())
  }

  pub fn export_invoice_on(
    &self,
    invoice: &Invoice,
    date: NaiveDate,
  ) -> Result<PathBuf, InvoiceError> {
    let path = self
      .output_dir
      .join(document_file_name(invoice.invoice_type(), date));

    self
      .renderer
      .render_to_file(invoice, self.settings.currency_label(), &path)?;

    Ok(path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::ports::StaticSettings;
  use rust_decimal_macros::dec;
  use std::path::Path;
  use std::sync::Mutex;

  #[derive(Default)]
  struct RecordingRenderer {
    calls: Mutex<Vec<(PathBuf, String)>>,
  }

  impl DocumentRenderer for RecordingRenderer {
    fn render_to_file(
      &self,
      _invoice: &Invoice,
      currency: &str,
      path: &Path,
    ) -> Result<(), InvoiceError> {
      self
        .calls
        .lock()
        .unwrap()
        .push((path.to_path_buf(), currency.to_string()));
      Ok(())
    }
  }

  struct FailingRenderer;

  impl DocumentRenderer for FailingRenderer {
    fn render_to_file(
      &self,
      _invoice: &Invoice,
      _currency: &str,
      path: &Path,
    ) -> Result<(), InvoiceError> {
      Err(InvoiceError::DocumentWrite {
        path: path.to_path_buf(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
      })
    }
  }

  fn settings() -> Arc<StaticSettings> {
    Arc::new(StaticSettings::new(
      vec!["sales".to_string(), "pro forma".to_string()],
      vec![dec!(0.23)],
      "PLN",
    ))
  }

  fn data(invoice_type: &str) -> InvoiceData {
    InvoiceData {
      invoice_type: invoice_type.to_string(),
      issuer_tax_no: "111".to_string(),
      recipient_tax_no: "222".to_string(),
      positions: vec!["Widget".to_string()],
      prices_net: vec![dec!(100.0)],
      tax_rates: vec![dec!(0.23)],
    }
  }

  #[test]
  fn test_document_file_name() {
    let settings = settings();
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();

    let sales = InvoiceType::new("sales".to_string(), settings.as_ref()).unwrap();
    assert_eq!(document_file_name(&sales, date), "sales_invoice_20240307.pdf");

    let pro_forma = InvoiceType::new("pro forma".to_string(), settings.as_ref()).unwrap();
    assert_eq!(
      document_file_name(&pro_forma, date),
      "pro_forma_invoice_20240307.pdf"
    );
  }

  #[test]
  fn test_export_passes_path_and_currency_to_renderer() {
    let renderer = Arc::new(RecordingRenderer::default());
    let service = InvoiceService::new(settings(), renderer.clone(), PathBuf::from("out"));
    let invoice = service.create_invoice(data("sales")).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();

    let path = service.export_invoice_on(&invoice, date).unwrap();

    assert_eq!(path, PathBuf::from("out").join("sales_invoice_20251231.pdf"));
    let calls = renderer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, path);
    assert_eq!(calls[0].1, "PLN");
  }

  #[test]
  fn test_export_uses_today_by_default() {
    let renderer = Arc::new(RecordingRenderer::default());
    let service = InvoiceService::new(settings(), renderer, PathBuf::from("."));
    let invoice = service.create_invoice(data("sales")).unwrap();

    let path = service.export_invoice(&invoice).unwrap();

    let expected = format!("sales_invoice_{}.pdf", Local::now().format("%Y%m%d"));
    assert_eq!(path.file_name().unwrap().to_str().unwrap(), expected);
  }

  #[test]
  fn test_export_propagates_write_errors() {
    let service = InvoiceService::new(settings(), Arc::new(FailingRenderer), PathBuf::from("."));
    let invoice = service.create_invoice(data("sales")).unwrap();

    let result = service.export_invoice(&invoice);

    assert!(matches!(result, Err(InvoiceError::DocumentWrite { .. })));
  }

  #[test]
  fn test_create_invoice_validates_against_settings() {
    let service = InvoiceService::new(
      settings(),
      Arc::new(RecordingRenderer::default()),
      PathBuf::from("."),
    );

    assert!(matches!(
      service.create_invoice(data("rental")),
      Err(InvoiceError::InvalidInvoiceType(_))
    ));
  }
}
