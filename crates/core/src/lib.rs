//! Pedido Listo
//!
//! Domain core of the Pedido Listo ordering portal: pricing, the persisted
//! cart, the signed-in session, role-gated routing and the read models of
//! the backend's orders, invoices, customers and audit log.

pub mod access;
pub mod audit;
pub mod cart;
pub mod customers;
pub mod dates;
pub mod invoices;
pub mod menu;
pub mod notice;
pub mod orders;
pub mod pricing;
pub mod routes;
pub mod session;
pub mod storage;
pub mod validation;
