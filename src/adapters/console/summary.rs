use std::io::{self, Write};

use crate::domain::invoice::Invoice;

const SEPARATOR_WIDTH: usize = 60;

/// Plain-text invoice summary for the terminal.
pub struct ConsolePresenter {
  currency: String,
}

impl ConsolePresenter {
  pub fn new(currency: &str) -> Self {
    Self {
      currency: currency.to_string(),
    }
  }

  pub fn render(&self, invoice: &Invoice) -> String {
    let separator = "=".repeat(SEPARATOR_WIDTH);

    let mut lines = vec![
      separator.clone(),
      invoice.invoice_type().title(),
      String::new(),
      format!("Issuer tax no.: {}", invoice.issuer_tax_no()),
      format!("Recipient tax no.: {}", invoice.recipient_tax_no()),
      String::new(),
      "Position\tNet amount\tTax rate\tGross amount".to_string(),
    ];
    lines.extend(invoice.lines().map(|line| {
      format!(
        "{}\t{}\t{}\t{}",
        line.position, line.net, line.tax_rate, line.gross
      )
    }));
    lines.extend([
      String::new(),
      format!("Net sum: {} {}", invoice.sum_net(), self.currency),
      format!("Tax sum: {} {}", invoice.sum_tax(), self.currency),
      format!("TOTAL SUM: {} {}", invoice.sum_gross(), self.currency),
      separator,
    ]);

    let mut out = lines.join("\n");
    out.push('\n');
    out
  }

  pub fn write_to<W: Write>(&self, invoice: &Invoice, writer: &mut W) -> io::Result<()> {
    writer.write_all(self.render(invoice).as_bytes())?;
    writer.flush()
  }

  /// Prints the summary to standard output.
  pub fn show(&self, invoice: &Invoice) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    self.write_to(invoice, &mut handle)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{InvoiceData, StaticSettings};
  use rust_decimal_macros::dec;

  fn invoice() -> Invoice {
    let settings = StaticSettings::new(
      vec!["sales".to_string()],
      vec![dec!(0.08), dec!(0.23)],
      "PLN",
    );
    let data = InvoiceData {
      invoice_type: "sales".to_string(),
      issuer_tax_no: "PL1234567890".to_string(),
      recipient_tax_no: "PL0987654321".to_string(),
      positions: vec!["Widget".to_string(), "Gadget".to_string()],
      prices_net: vec![dec!(100), dec!(50)],
      tax_rates: vec![dec!(0.23), dec!(0.08)],
    };
    Invoice::new(data, &settings).unwrap()
  }

  #[test]
  fn test_render_layout() {
    let text = ConsolePresenter::new("PLN").render(&invoice());
    let separator = "=".repeat(60);

    let expected = [
      separator.as_str(),
      "SALES INVOICE",
      "",
      "Issuer tax no.: PL1234567890",
      "Recipient tax no.: PL0987654321",
      "",
      "Position\tNet amount\tTax rate\tGross amount",
      "Widget\t100\t0.23\t123.00",
      "Gadget\t50\t0.08\t54.00",
      "",
      "Net sum: 150 PLN",
      "Tax sum: 27.00 PLN",
      "TOTAL SUM: 177.00 PLN",
      separator.as_str(),
    ];
    assert_eq!(text.lines().collect::<Vec<_>>(), expected);
  }

  #[test]
  fn test_write_to_matches_render() {
    let presenter = ConsolePresenter::new("EUR");
    let invoice = invoice();
    let mut buffer = Vec::new();

    presenter.write_to(&invoice, &mut buffer).unwrap();

    assert_eq!(String::from_utf8(buffer).unwrap(), presenter.render(&invoice));
  }
}
