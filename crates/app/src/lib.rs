//! Backend boundary, flows and configuration of the Pedido Listo portal.

pub mod audit;
pub mod auth;
pub mod backend;
pub mod config;
pub mod context;
pub mod customers;
pub mod invoices;
pub mod menu;
pub mod observability;
pub mod orders;
pub mod state;
