use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::invoice::{Invoice, InvoiceData, InvoiceError, InvoiceService};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceLineDto {
  pub position: String,
  pub net: Decimal,
  pub tax_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceCommand {
  pub invoice_type: String,
  pub issuer_tax_no: String,
  pub recipient_tax_no: String,
  #[serde(default)]
  pub lines: Vec<CreateInvoiceLineDto>,
}

impl From<CreateInvoiceCommand> for InvoiceData {
  fn from(command: CreateInvoiceCommand) -> Self {
    let mut positions = Vec::with_capacity(command.lines.len());
    let mut prices_net = Vec::with_capacity(command.lines.len());
    let mut tax_rates = Vec::with_capacity(command.lines.len());
    for line in command.lines {
      positions.push(line.position);
      prices_net.push(line.net);
      tax_rates.push(line.tax_rate);
    }

    InvoiceData {
      invoice_type: command.invoice_type,
      issuer_tax_no: command.issuer_tax_no,
      recipient_tax_no: command.recipient_tax_no,
      positions,
      prices_net,
      tax_rates,
    }
  }
}

pub struct CreateInvoiceUseCase {
  invoice_service: Arc<InvoiceService>,
}

impl CreateInvoiceUseCase {
  pub fn new(invoice_service: Arc<InvoiceService>) -> Self {
    Self { invoice_service }
  }

  pub fn execute(&self, command: CreateInvoiceCommand) -> Result<Invoice, InvoiceError> {
    let invoice = self.invoice_service.create_invoice(command.into())?;

    tracing::info!(
      "Created {} invoice with {} line(s), gross total {}",
      invoice.invoice_type(),
      invoice.len(),
      invoice.sum_gross()
    );

    Ok(invoice)
  }
}
