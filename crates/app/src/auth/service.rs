//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use pedido_listo::session::{
    BearerToken, Credentials, NationalId, NewCustomer, Session, UserProfile,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    auth::AuthError,
    backend::{BackendError, GraphqlClient, Operation},
};

const LOGIN: Operation = Operation {
    field: "login",
    document: r"
        mutation UserLogin($loginInput: LoginInput!) {
            login(loginInput: $loginInput) {
                access_token
                user {
                    cedula
                    nombre
                    apellido
                    email
                    telefono
                    direccionPrincipal
                    rol { id nombre }
                }
            }
        }
    ",
};

const REGISTER: Operation = Operation {
    field: "register",
    document: r"
        mutation RegisterUser($createUsuarioInput: CreateUsuarioInput!) {
            register(createUsuarioInput: $createUsuarioInput) {
                cedula
                email
                nombre
                rol { nombre }
            }
        }
    ",
};

#[derive(Debug, Deserialize)]
struct LoginPayload {
    access_token: String,
    user: UserProfile,
}

/// Account created by a registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisteredUser {
    /// National identity number.
    #[serde(rename = "cedula")]
    pub national_id: NationalId,

    /// Login e-mail.
    pub email: String,

    /// Given name.
    #[serde(rename = "nombre")]
    pub first_name: String,
}

#[derive(Debug, Clone)]
pub struct GraphqlAuthService {
    client: GraphqlClient,
}

impl GraphqlAuthService {
    #[must_use]
    pub fn new(client: GraphqlClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl AuthService for GraphqlAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let variables = json!({
            "loginInput": {
                "email": credentials.email.trim(),
                "password": credentials.password,
            }
        });

        let payload: LoginPayload = match self.client.execute(LOGIN, variables).await {
            Ok(payload) => payload,
            Err(BackendError::MissingData(_) | BackendError::Unauthorized { .. }) => {
                return Err(AuthError::InvalidCredentials);
            }
            Err(error) => return Err(error.into()),
        };

        Ok(Session {
            user: payload.user,
            token: BearerToken::new(payload.access_token),
        })
    }

    async fn register(&self, customer: &NewCustomer) -> Result<RegisteredUser, AuthError> {
        let variables = json!({ "createUsuarioInput": customer });

        Ok(self.client.execute(REGISTER, variables).await?)
    }
}

#[automock]
#[async_trait(?Send)]
pub trait AuthService: Send + Sync {
    /// Exchanges credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session, AuthError>;

    /// Creates a customer account. Doesn't sign anyone in.
    async fn register(&self, customer: &NewCustomer) -> Result<RegisteredUser, AuthError>;
}
