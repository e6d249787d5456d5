mod data;
mod generator;
mod path;

pub use data::{render_invoice, InvoiceData, InvoiceLineItem, Issuer};
pub use generator::{Generated, Generator};
pub use path::{invoice_file_name, invoice_folder, invoice_path, padded_number};
