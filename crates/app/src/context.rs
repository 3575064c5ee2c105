//! App Context

use std::sync::Arc;

use crate::{
    audit::{AuditService, GraphqlAuditService},
    auth::{AuthService, GraphqlAuthService},
    backend::{GraphqlClient, RestClient, TokenSource},
    config::{CheckoutConfig, ConfigError, PortalConfig},
    customers::{CustomersService, GraphqlCustomersService},
    invoices::{InvoicesService, RestInvoicesService},
    menu::{GraphqlMenuService, MenuService},
    orders::{GraphqlOrdersService, OrdersService},
};

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub menu: Arc<dyn MenuService>,
    pub orders: Arc<dyn OrdersService>,
    pub customers: Arc<dyn CustomersService>,
    pub invoices: Arc<dyn InvoicesService>,
    pub audit: Arc<dyn AuditService>,
    pub checkout: CheckoutConfig,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// Unset endpoints are derived from the page `origin`. Every outgoing
    /// call carries the token `tokens` yields at the time of the call.
    ///
    /// # Errors
    ///
    /// Returns an error when an endpoint can't be resolved.
    pub fn from_config(
        config: &PortalConfig,
        origin: Option<&str>,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, ConfigError> {
        let endpoints = config.backend.endpoints(origin)?;

        let graphql = GraphqlClient::new(endpoints.graphql, Arc::clone(&tokens));
        let rest = RestClient::new(endpoints.rest, tokens);

        Ok(Self {
            auth: Arc::new(GraphqlAuthService::new(graphql.clone())),
            menu: Arc::new(GraphqlMenuService::new(graphql.clone())),
            orders: Arc::new(GraphqlOrdersService::new(graphql.clone())),
            customers: Arc::new(GraphqlCustomersService::new(graphql.clone())),
            audit: Arc::new(GraphqlAuditService::new(graphql)),
            invoices: Arc::new(RestInvoicesService::new(rest)),
            checkout: config.checkout.clone(),
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("checkout", &self.checkout)
            .finish_non_exhaustive()
    }
}
