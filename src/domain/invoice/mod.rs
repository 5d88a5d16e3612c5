pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Invoice, InvoiceData, InvoiceLine};
pub use errors::InvoiceError;
pub use ports::{DocumentRenderer, InvoiceSettings, StaticSettings};
pub use services::{InvoiceService, document_file_name};
pub use value_objects::{InvoiceType, NetAmount, TaxRate, ValueObjectError};
