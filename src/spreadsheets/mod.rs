pub mod completion_xlsx;

pub use completion_xlsx::{export_completion_xlsx, CompletionReportRow};
