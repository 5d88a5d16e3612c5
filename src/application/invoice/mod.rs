pub mod create_invoice;
pub mod export_invoice;

pub use create_invoice::{CreateInvoiceCommand, CreateInvoiceLineDto, CreateInvoiceUseCase};
pub use export_invoice::{ExportInvoiceResponse, ExportInvoiceUseCase};
