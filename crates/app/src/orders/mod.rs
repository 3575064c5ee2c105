//! Orders

pub mod checkout;
mod service;

pub use checkout::{CheckoutError, Checkout, SubmissionMode, submit_order};
pub use service::*;
