//! Auth errors.

use pedido_listo::{notice::Notice, validation::ValidationErrors};
use thiserror::Error;

use crate::backend::BackendError;

const BAD_CREDENTIALS: &str = "Email o contraseña incorrectos.";
const REGISTRATION_FAILED: &str =
    "No se pudo crear la cuenta. El email o la cédula ya podrían estar en uso.";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid e-mail or password")]
    InvalidCredentials,

    #[error("registration form is invalid: {0}")]
    Invalid(#[source] ValidationErrors),

    #[error("backend error")]
    Backend(#[from] BackendError),
}

impl AuthError {
    /// Notice shown after a failed sign-in.
    #[must_use]
    pub fn login_notice(&self) -> Notice {
        Notice::error("Error al iniciar sesión", self.message(BAD_CREDENTIALS))
    }

    /// Notice shown after a failed registration.
    #[must_use]
    pub fn register_notice(&self) -> Notice {
        match self {
            Self::Invalid(errors) => Notice::from(errors),
            Self::InvalidCredentials | Self::Backend(_) => {
                Notice::error("Error en el registro", self.message(REGISTRATION_FAILED))
            }
        }
    }

    fn message(&self, fallback: &str) -> String {
        match self {
            Self::InvalidCredentials => fallback.to_string(),
            Self::Invalid(errors) => errors.to_string(),
            Self::Backend(error) => error.user_message(fallback),
        }
    }
}
