//! Authentication

mod errors;
pub mod flow;
mod service;

pub use errors::*;
pub use service::*;
