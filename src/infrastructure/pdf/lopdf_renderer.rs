use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::invoice::errors::InvoiceError;
use crate::domain::invoice::ports::DocumentRenderer;
use crate::domain::invoice::Invoice;

// A4 portrait, all layout in millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 10.0;
const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const PAGE_BREAK_AT: f32 = PAGE_HEIGHT - 20.0;
const CELL_PADDING: f32 = 1.0;
const LINE_WIDTH: f32 = 0.2;
const PT_PER_MM: f32 = 72.0 / 25.4;

const COLUMN_WIDTHS: [f32; 4] = [100.0, 30.0, 30.0, 30.0];
const COLUMN_HEADERS: [&str; 4] = ["Position", "Net amount", "Tax rate", "Gross amount"];
const HEADER_HEIGHT: f32 = 8.0;
const ROW_HEIGHT: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
  Regular,
  Bold,
}

impl Face {
  fn resource_name(self) -> &'static [u8] {
    match self {
      Face::Regular => b"F1",
      Face::Bold => b"F2",
    }
  }

  /// Approximate Times advance width in 1/1000 em.
  fn char_width(self, c: char) -> f32 {
    let bold = self == Face::Bold;
    match c {
      ' ' | '.' | ',' => 250.0,
      ':' | ';' => {
        if bold {
          333.0
        } else {
          278.0
        }
      }
      '-' | '(' | ')' => 333.0,
      '0'..='9' => 500.0,
      'i' | 'j' | 'l' | 't' | 'f' | 'I' => 300.0,
      'm' | 'w' => 750.0,
      'M' | 'W' => 900.0,
      'a'..='z' => {
        if bold {
          520.0
        } else {
          460.0
        }
      }
      'A'..='Z' => {
        if bold {
          720.0
        } else {
          680.0
        }
      }
      _ => 500.0,
    }
  }

  fn text_width_mm(self, text: &str, size: f32) -> f32 {
    let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
    units / 1000.0 * size / PT_PER_MM
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
  Left,
  Right,
}

fn to_pt(mm: f32) -> Object {
  Object::Real(mm * PT_PER_MM)
}

/// WinAnsiEncoding byte for `c`, or '?' when the standard fonts cannot show it.
fn win_ansi_byte(c: char) -> u8 {
  match c {
    '\u{00}'..='\u{7F}' | '\u{A0}'..='\u{FF}' => c as u8,
    // The C1 control block is reused for typographic characters
    '\u{20AC}' => 0x80,
    '\u{201A}' => 0x82,
    '\u{0192}' => 0x83,
    '\u{201E}' => 0x84,
    '\u{2026}' => 0x85,
    '\u{2020}' => 0x86,
    '\u{2021}' => 0x87,
    '\u{02C6}' => 0x88,
    '\u{2030}' => 0x89,
    '\u{0160}' => 0x8A,
    '\u{2039}' => 0x8B,
    '\u{0152}' => 0x8C,
    '\u{017D}' => 0x8E,
    '\u{2018}' => 0x91,
    '\u{2019}' => 0x92,
    '\u{201C}' => 0x93,
    '\u{201D}' => 0x94,
    '\u{2022}' => 0x95,
    '\u{2013}' => 0x96,
    '\u{2014}' => 0x97,
    '\u{02DC}' => 0x98,
    '\u{2122}' => 0x99,
    '\u{0161}' => 0x9A,
    '\u{203A}' => 0x9B,
    '\u{0153}' => 0x9C,
    '\u{017E}' => 0x9E,
    '\u{0178}' => 0x9F,
    _ => b'?',
  }
}

fn encode_text(text: &str) -> Object {
  let bytes = text.chars().map(win_ansi_byte).collect();
  Object::String(bytes, StringFormat::Literal)
}

/// Sequential cell placement with automatic page breaks.
struct PageLayout {
  finished: Vec<Vec<Operation>>,
  current: Vec<Operation>,
  x: f32,
  y: f32,
  face: Face,
  size: f32,
}

impl PageLayout {
  fn new() -> Self {
    let mut layout = Self {
      finished: Vec::new(),
      current: Vec::new(),
      x: MARGIN,
      y: MARGIN,
      face: Face::Regular,
      size: 12.0,
    };
    layout.start_page();
    layout
  }

  fn start_page(&mut self) {
    self
      .current
      .push(Operation::new("w", vec![to_pt(LINE_WIDTH)]));
  }

  fn add_page(&mut self) {
    let page = std::mem::take(&mut self.current);
    self.finished.push(page);
    self.x = MARGIN;
    self.y = MARGIN;
    self.start_page();
  }

  fn set_font(&mut self, face: Face, size: f32) {
    self.face = face;
    self.size = size;
  }

  fn fits(&self, height: f32) -> bool {
    self.y + height <= PAGE_BREAK_AT
  }

  fn cell(&mut self, width: f32, height: f32, text: &str, border: bool, align: Align) {
    let bottom = PAGE_HEIGHT - self.y - height;

    if border {
      self.current.push(Operation::new(
        "re",
        vec![to_pt(self.x), to_pt(bottom), to_pt(width), to_pt(height)],
      ));
      self.current.push(Operation::new("S", vec![]));
    }

    if !text.is_empty() {
      let text_x = match align {
        Align::Left => self.x + CELL_PADDING,
        Align::Right => {
          self.x + width - CELL_PADDING - self.face.text_width_mm(text, self.size)
        }
      };
      // Vertically centred, as a fraction of the font size
      let size_mm = self.size / PT_PER_MM;
      let baseline = PAGE_HEIGHT - (self.y + 0.5 * height + 0.3 * size_mm);

      self.current.push(Operation::new("BT", vec![]));
      self.current.push(Operation::new(
        "Tf",
        vec![
          Object::Name(self.face.resource_name().to_vec()),
          Object::Real(self.size),
        ],
      ));
      self
        .current
        .push(Operation::new("Td", vec![to_pt(text_x), to_pt(baseline)]));
      self
        .current
        .push(Operation::new("Tj", vec![encode_text(text)]));
      self.current.push(Operation::new("ET", vec![]));
    }

    self.x += width;
  }

  fn line_break(&mut self, height: f32) {
    self.x = MARGIN;
    self.y += height;
  }

  fn into_pages(mut self) -> Vec<Vec<Operation>> {
    self.finished.push(self.current);
    self.finished
  }
}

/// Renders invoices as A4 PDF documents using the standard Times fonts.
#[derive(Debug, Default, Clone)]
pub struct LopdfInvoiceRenderer;

impl LopdfInvoiceRenderer {
  pub fn new() -> Self {
    Self
  }

  fn table_header(layout: &mut PageLayout) {
    layout.set_font(Face::Bold, 12.0);
    for (width, label) in COLUMN_WIDTHS.iter().zip(COLUMN_HEADERS) {
      layout.cell(*width, HEADER_HEIGHT, label, true, Align::Left);
    }
    layout.line_break(HEADER_HEIGHT);
    layout.set_font(Face::Regular, 12.0);
  }

  fn layout(invoice: &Invoice, currency: &str) -> Vec<Vec<Operation>> {
    let mut layout = PageLayout::new();

    layout.set_font(Face::Bold, 16.0);
    layout.cell(
      CONTENT_WIDTH,
      16.0,
      &invoice.invoice_type().title(),
      false,
      Align::Left,
    );
    layout.line_break(16.0);

    layout.set_font(Face::Regular, 12.0);
    for line in [
      format!("Issuer tax no.: {}", invoice.issuer_tax_no()),
      format!("Recipient tax no.: {}", invoice.recipient_tax_no()),
    ] {
      layout.cell(CONTENT_WIDTH, ROW_HEIGHT, &line, false, Align::Left);
      layout.line_break(ROW_HEIGHT);
    }

    Self::table_header(&mut layout);
    for line in invoice.lines() {
      if !layout.fits(ROW_HEIGHT) {
        layout.add_page();
        Self::table_header(&mut layout);
      }
      let cells = [
        line.position.to_string(),
        line.net.to_string(),
        line.tax_rate.to_string(),
        line.gross.to_string(),
      ];
      for (width, text) in COLUMN_WIDTHS.iter().zip(&cells) {
        layout.cell(*width, ROW_HEIGHT, text, true, Align::Left);
      }
      layout.line_break(ROW_HEIGHT);
    }

    let summary = [
      (format!("Net sum: {} {}", invoice.sum_net(), currency), Face::Regular),
      (format!("Tax sum: {} {}", invoice.sum_tax(), currency), Face::Regular),
      (
        format!("TOTAL SUM: {} {}", invoice.sum_gross(), currency),
        Face::Bold,
      ),
    ];
    for (text, face) in summary {
      if !layout.fits(ROW_HEIGHT) {
        layout.add_page();
      }
      layout.set_font(face, 12.0);
      layout.cell(CONTENT_WIDTH, ROW_HEIGHT, &text, false, Align::Right);
      layout.line_break(ROW_HEIGHT);
    }

    layout.into_pages()
  }

  fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
      "Type" => "Font",
      "Subtype" => "Type1",
      "BaseFont" => base_font,
      "Encoding" => "WinAnsiEncoding",
    })
  }

  fn build_document(pages: Vec<Vec<Operation>>) -> Result<Document, InvoiceError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = Self::font(&mut doc, "Times-Roman");
    let bold_id = Self::font(&mut doc, "Times-Bold");
    let resources_id = doc.add_object(dictionary! {
      "Font" => dictionary! {
        "F1" => regular_id,
        "F2" => bold_id,
      },
    });

    let mut kids = Vec::with_capacity(pages.len());
    for operations in pages {
      let content = Content { operations };
      let encoded = content
        .encode()
        .map_err(|e| InvoiceError::DocumentEncoding(e.to_string()))?;
      let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
      let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
      });
      kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    let media_box = vec![
      Object::Integer(0),
      Object::Integer(0),
      Object::Real(PAGE_WIDTH * PT_PER_MM),
      Object::Real(PAGE_HEIGHT * PT_PER_MM),
    ];
    doc.objects.insert(
      pages_id,
      Object::Dictionary(dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => media_box,
      }),
    );

    let catalog_id = doc.add_object(dictionary! {
      "Type" => "Catalog",
      "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    Ok(doc)
  }
}

impl DocumentRenderer for LopdfInvoiceRenderer {
  fn render_to_file(
    &self,
    invoice: &Invoice,
    currency: &str,
    path: &Path,
  ) -> Result<(), InvoiceError> {
    let pages = Self::layout(invoice, currency);
    let page_count = pages.len();
    let mut doc = Self::build_document(pages)?;

    let write_error = |source| InvoiceError::DocumentWrite {
      path: path.to_path_buf(),
      source,
    };
    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(write_error)?;
    writer.flush().map_err(write_error)?;

    tracing::debug!(
      "Wrote {} page(s) to {}",
      page_count,
      path.display()
    );
    Ok(())
  }
}
