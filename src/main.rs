use anyhow::{Context, Result, bail};
use std::env;
use std::fs;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicegen::{
  adapters::console::ConsolePresenter,
  application::invoice::{CreateInvoiceCommand, CreateInvoiceUseCase, ExportInvoiceUseCase},
  domain::invoice::InvoiceService,
  infrastructure::{config::Config, pdf::LopdfInvoiceRenderer},
};

const USAGE: &str = "usage: invoicegen <request.json> [--pdf]";

fn main() -> Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Logs go to stderr so stdout carries only the invoice
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicegen=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let mut request_path = None;
  let mut export_pdf = false;
  for arg in env::args().skip(1) {
    match arg.as_str() {
      "--pdf" => export_pdf = true,
      "-h" | "--help" => {
        println!("{}", USAGE);
        return Ok(());
      }
      _ if request_path.is_none() => request_path = Some(arg),
      _ => bail!("unexpected argument '{}'\n{}", arg, USAGE),
    }
  }
  let Some(request_path) = request_path else {
    bail!(USAGE);
  };

  let config = Config::load().context("Failed to load configuration")?;
  tracing::debug!(
    "Configuration loaded: {} invoice type(s), {} tax rate(s)",
    config.invoice.types.len(),
    config.invoice.tax_rates.len()
  );

  let raw = fs::read_to_string(&request_path)
    .with_context(|| format!("Failed to read invoice request {}", request_path))?;
  let command: CreateInvoiceCommand = serde_json::from_str(&raw)
    .with_context(|| format!("Invalid invoice request {}", request_path))?;

  let presenter = ConsolePresenter::new(&config.invoice.currency);
  let invoice_service = Arc::new(InvoiceService::new(
    Arc::new(config.invoice.clone()),
    Arc::new(LopdfInvoiceRenderer::new()),
    config.pdf.output_path(),
  ));

  let invoice = CreateInvoiceUseCase::new(invoice_service.clone())
    .execute(command)
    .context("Failed to create invoice")?;

  presenter
    .show(&invoice)
    .context("Failed to print invoice")?;

  if export_pdf {
    let response = ExportInvoiceUseCase::new(invoice_service)
      .execute(&invoice)
      .context("Failed to export invoice")?;
    tracing::info!("PDF written: {}", response.path.display());
  }

  Ok(())
}
