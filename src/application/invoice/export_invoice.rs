use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::invoice::{Invoice, InvoiceError, InvoiceService};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInvoiceResponse {
  pub path: PathBuf,
}

pub struct ExportInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl ExportInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub fn execute(&self, invoice: &Invoice) -> Result<ExportInvoiceResponse, InvoiceError> {
    let path = self.invoice_service.export_invoice(invoice)?;
    tracing::info!("Invoice exported to {}", path.display());
    Ok(ExportInvoiceResponse { path })
  }

  pub fn execute_on(
    &self,
    invoice: &Invoice,
    date: NaiveDate,
  ) -> Result<ExportInvoiceResponse, InvoiceError> {
    let path = self.invoice_service.export_invoice_on(invoice, date)?;
    tracing::info!("Invoice exported to {}", path.display());
    Ok(ExportInvoiceResponse { path })
  }
}
