//! Audit log service.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::audit::AuditRecord;
use serde_json::Value;

use crate::backend::{BackendError, GraphqlClient, Operation};

const LIST_RECORDS: Operation = Operation {
    field: "auditorias",
    document: r"
        query GetAuditorias {
            auditorias {
                id
                usuarioCedula
                fechaHora
                tipoAccion
                nombreTabla
                registroId
                datosAnteriores
                datosNuevos
            }
        }
    ",
};

#[derive(Debug, Clone)]
pub struct GraphqlAuditService {
    client: GraphqlClient,
}

impl GraphqlAuditService {
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl AuditService for GraphqlAuditService {
    async fn list_records(&self) -> Result<Vec<AuditRecord>, BackendError> {
        self.client.execute(LIST_RECORDS, Value::Null).await
    }
}

#[automock]
#[async_trait(?Send)]
pub trait AuditService: Send + Sync {
    /// Every audit record, in backend order.
    async fn list_records(&self) -> Result<Vec<AuditRecord>, BackendError>;
}
