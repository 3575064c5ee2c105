//! Customer accounts service.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::{
    customers::customers_only,
    session::{AccountStatus, NationalId, UserProfile},
};
use serde_json::{Value, json};

use crate::backend::{BackendError, GraphqlClient, Operation};

const LIST_USERS: Operation = Operation {
    field: "usuarios",
    document: r"
        query GetUsuarios {
            usuarios {
                cedula
                nombre
                apellido
                email
                telefono
                direccionPrincipal
                estado
                rol { id nombre }
            }
        }
    ",
};

const UPDATE_USER: Operation = Operation {
    field: "updateUsuario",
    document: r"
        mutation UpdateUsuarioEstado($updateUsuarioInput: UpdateUsuarioInput!) {
            updateUsuario(updateUsuarioInput: $updateUsuarioInput) {
                cedula
                estado
            }
        }
    ",
};

#[derive(Debug, Clone)]
pub struct GraphqlCustomersService {
    client: GraphqlClient,
}

impl GraphqlCustomersService {
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl CustomersService for GraphqlCustomersService {
    async fn list_customers(&self) -> Result<Vec<UserProfile>, BackendError> {
        let users: Vec<UserProfile> = self.client.execute(LIST_USERS, Value::Null).await?;

        Ok(customers_only(users))
    }

    async fn set_status(&self, id: &NationalId, status: AccountStatus) -> Result<(), BackendError> {
        let variables = json!({
            "updateUsuarioInput": { "cedula": id, "estado": status }
        });

        let _: Value = self.client.execute(UPDATE_USER, variables).await?;

        Ok(())
    }
}

#[automock]
#[async_trait(?Send)]
pub trait CustomersService: Send + Sync {
    /// Accounts holding the customer role.
    async fn list_customers(&self) -> Result<Vec<UserProfile>, BackendError>;

    /// Activates or deactivates customer `id`.
    async fn set_status(&self, id: &NationalId, status: AccountStatus) -> Result<(), BackendError>;
}
