// Headcount research API
//
// Exposes the batch research engine over HTTP: POST a list of company
// names, get back one reconciled headcount per company.

pub mod config;
pub mod server;

pub use config::*;
