//! Domain models

mod label_item;
mod print_job;
mod printer;

pub use label_item::LabelItem;
pub use print_job::{Dpi, OutputFormat, PaperSize, PrintOptions, PrintRequest};
pub use printer::{PrinterDescriptor, PrinterStatus};
