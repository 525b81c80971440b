pub mod components;
pub mod layouts;
pub mod report;

pub use layouts::email::email_layout;
pub use report::valuation_report_email;
