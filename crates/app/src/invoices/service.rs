//! Invoicing service, over the REST API.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::invoices::{Invoice, NewInvoice};

use crate::backend::{BackendError, RestClient};

const ALL_INVOICES: &str = "/facturacion";
const MY_INVOICES: &str = "/facturacion/mis-facturas";

#[derive(Debug, Clone)]
pub struct RestInvoicesService {
    client: RestClient,
}

impl RestInvoicesService {
    #[must_use]
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl InvoicesService for RestInvoicesService {
    async fn list_all(&self) -> Result<Vec<Invoice>, BackendError> {
        self.client.get(ALL_INVOICES).await
    }

    async fn list_mine(&self) -> Result<Vec<Invoice>, BackendError> {
        self.client.get(MY_INVOICES).await
    }

    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, BackendError> {
        self.client.post(ALL_INVOICES, invoice).await
    }
}

#[automock]
#[async_trait(?Send)]
pub trait InvoicesService: Send + Sync {
    /// Every invoice; staff only.
    async fn list_all(&self) -> Result<Vec<Invoice>, BackendError>;

    /// Invoices of the signed-in customer.
    async fn list_mine(&self) -> Result<Vec<Invoice>, BackendError>;

    /// Issues an invoice.
    async fn create(&self, invoice: &NewInvoice) -> Result<Invoice, BackendError>;
}
