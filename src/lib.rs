//! `tasador` library crate: instant property valuation for Spanish homes.
//!
//! The binary is a thin astra server around this library, so the pricing
//! model and cadastral normalization are testable without a socket.

pub mod cadastral;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod mailer;
pub mod report;
pub mod responses;
pub mod router;
pub mod spreadsheets;
pub mod templates;
pub mod valuation;

#[cfg(test)]
mod tests;
