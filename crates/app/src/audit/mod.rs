//! Audit log

mod service;

pub use service::*;
