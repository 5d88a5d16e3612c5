pub mod lopdf_renderer;

pub use lopdf_renderer::LopdfInvoiceRenderer;
