//! Invoices

mod service;

pub use service::*;
