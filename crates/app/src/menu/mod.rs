//! Dishes

mod service;

pub use service::*;
