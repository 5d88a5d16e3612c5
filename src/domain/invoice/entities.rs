use rust_decimal::Decimal;

use super::errors::InvoiceError;
use super::ports::InvoiceSettings;
use super::value_objects::{InvoiceType, NetAmount, TaxRate};

/// Raw invoice input, index-aligned by line.
#[derive(Debug, Clone)]
pub struct InvoiceData {
  pub invoice_type: String,
  pub issuer_tax_no: String,
  pub recipient_tax_no: String,
  pub positions: Vec<String>,
  pub prices_net: Vec<Decimal>,
  pub tax_rates: Vec<Decimal>,
}

// Invoice - validated on construction, immutable afterwards
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
  invoice_type: InvoiceType,
  issuer_tax_no: String,
  recipient_tax_no: String,
  positions: Vec<String>,
  prices_net: Vec<NetAmount>,
  tax_rates: Vec<TaxRate>,
  prices_gross: Vec<Decimal>,
  sum_net: Decimal,
  sum_gross: Decimal,
  sum_tax: Decimal,
}

/// One itemized row of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceLine<'a> {
  pub position: &'a str,
  pub net: Decimal,
  pub tax_rate: Decimal,
  pub gross: Decimal,
}

impl Invoice {
  /// Validates `data` against `settings` and computes every derived amount.
  ///
  /// Checks run in a fixed order: invoice type, line counts, net amounts,
  /// tax rates. Each stops at the first offending line. Amounts that do not
  /// fit a `Decimal` are reported as `AmountOverflow` instead of panicking.
  pub fn new(data: InvoiceData, settings: &dyn InvoiceSettings) -> Result<Self, InvoiceError> {
    let invoice_type = InvoiceType::new(data.invoice_type.clone(), settings)
      .map_err(|_| InvoiceError::InvalidInvoiceType(data.invoice_type))?;

    let (positions, prices, rates) = (
      data.positions.len(),
      data.prices_net.len(),
      data.tax_rates.len(),
    );
    if positions != prices || positions != rates {
      return Err(InvoiceError::LineCountMismatch {
        positions,
        prices,
        rates,
      });
    }

    let prices_net = data
      .prices_net
      .into_iter()
      .enumerate()
      .map(|(index, amount)| {
        NetAmount::new(amount).map_err(|_| InvoiceError::NegativeNetPrice { index, amount })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let tax_rates = data
      .tax_rates
      .into_iter()
      .enumerate()
      .map(|(index, rate)| {
        TaxRate::new(rate, settings).map_err(|_| InvoiceError::InvalidTaxRate { index, rate })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let prices_gross = prices_net
      .iter()
      .zip(&tax_rates)
      .enumerate()
      .map(|(index, (net, rate))| {
        rate
          .apply(net.value())
          .ok_or(InvoiceError::AmountOverflow { index })
      })
      .collect::<Result<Vec<_>, _>>()?;

    let sum_net = checked_sum(prices_net.iter().map(NetAmount::value))?;
    let sum_gross = checked_sum(prices_gross.iter().copied())?;
    // Derived by subtraction so that net + tax always equals gross
    let sum_tax = sum_gross
      .checked_sub(sum_net)
      .ok_or(InvoiceError::AmountOverflow {
        index: positions.saturating_sub(1),
      })?;

    Ok(Self {
      invoice_type,
      issuer_tax_no: data.issuer_tax_no,
      recipient_tax_no: data.recipient_tax_no,
      positions: data.positions,
      prices_net,
      tax_rates,
      prices_gross,
      sum_net,
      sum_gross,
      sum_tax,
    })
  }

  pub fn invoice_type(&self) -> &InvoiceType {
    &self.invoice_type
  }

  pub fn issuer_tax_no(&self) -> &str {
    &self.issuer_tax_no
  }

  pub fn recipient_tax_no(&self) -> &str {
    &self.recipient_tax_no
  }

  pub fn positions(&self) -> &[String] {
    &self.positions
  }

  pub fn prices_net(&self) -> Vec<Decimal> {
    self.prices_net.iter().map(NetAmount::value).collect()
  }

  pub fn tax_rates(&self) -> Vec<Decimal> {
    self.tax_rates.iter().map(TaxRate::value).collect()
  }

  pub fn prices_gross(&self) -> &[Decimal] {
    &self.prices_gross
  }

  pub fn sum_net(&self) -> Decimal {
    self.sum_net
  }

  pub fn sum_gross(&self) -> Decimal {
    self.sum_gross
  }

  pub fn sum_tax(&self) -> Decimal {
    self.sum_tax
  }

  pub fn len(&self) -> usize {
    self.positions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn lines(&self) -> impl Iterator<Item = InvoiceLine<'_>> + '_ {
    self
      .positions
      .iter()
      .zip(&self.prices_net)
      .zip(&self.tax_rates)
      .zip(&self.prices_gross)
      .map(|(((position, net), rate), gross)| InvoiceLine {
        position,
        net: net.value(),
        tax_rate: rate.value(),
        gross: *gross,
      })
  }
}

/// Adds `amounts` in order, reporting the line at which the running total
/// leaves the `Decimal` range.
fn checked_sum(amounts: impl Iterator<Item = Decimal>) -> Result<Decimal, InvoiceError> {
  amounts
    .enumerate()
    .try_fold(Decimal::ZERO, |total, (index, amount)| {
      total
        .checked_add(amount)
        .ok_or(InvoiceError::AmountOverflow { index })
    })
}
