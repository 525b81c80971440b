pub mod connection;
pub mod reports;

pub use connection::{init_db, Database};
pub use reports::{find_report, get_report, insert_report, list_reports};
