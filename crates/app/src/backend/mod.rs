//! Backend boundary
//!
//! The portal owns no data. Menu, orders, customers and the audit log live
//! behind a GraphQL endpoint; invoices behind a REST API. Both clients attach
//! the signed-in user's bearer token.

mod errors;
pub mod graphql;
pub mod rest;

use pedido_listo::session::BearerToken;

pub use errors::BackendError;
pub use graphql::{GraphqlClient, Operation};
pub use rest::RestClient;

/// Supplies the bearer token for outgoing calls.
pub trait TokenSource: Send + Sync {
    /// Token of the signed-in user, if any.
    fn bearer(&self) -> Option<BearerToken>;
}

/// A token source for calls made before anyone signs in.
#[derive(Debug, Default, Clone, Copy)]
pub struct Anonymous;

impl TokenSource for Anonymous {
    fn bearer(&self) -> Option<BearerToken> {
        None
    }
}
