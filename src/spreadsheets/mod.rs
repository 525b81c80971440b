pub mod reports_xlsx;

pub use reports_xlsx::{export_reports_xlsx, reports_workbook};
