//! Customers

mod service;

pub use service::*;
