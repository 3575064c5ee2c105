//! Backend errors.

use thiserror::Error;

/// Failures talking to the GraphQL or REST backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("backend unreachable")]
    Network(#[source] reqwest::Error),

    /// The backend refused the request and said why.
    #[error("backend rejected the request: {}", .messages.join("; "))]
    Rejected {
        /// Messages reported by the backend, first one first.
        messages: Vec<String>,
    },

    /// The bearer token was missing, expired or lacks the role.
    #[error("not authorized (status {status})")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
    },

    /// The requested resource doesn't exist.
    #[error("not found")]
    NotFound,

    /// The response body didn't have the expected shape.
    #[error("unexpected response body")]
    Decode(#[source] serde_json::Error),

    /// A successful response carried no data for the operation.
    #[error("response is missing `{0}`")]
    MissingData(&'static str),
}

impl BackendError {
    /// A rejection carrying a single message.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            messages: vec![message.into()],
        }
    }

    /// First backend-provided message, when there is one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Rejected { messages } => messages.first().map(String::as_str),
            Self::Network(_)
            | Self::Unauthorized { .. }
            | Self::NotFound
            | Self::Decode(_)
            | Self::MissingData(_) => None,
        }
    }

    /// Message to show the user: the backend's own, or `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Network(_) => "No se pudo conectar con el servidor.".to_string(),
            Self::Unauthorized { .. } => "Tu sesión no tiene permiso para esta acción.".to_string(),
            Self::NotFound => "El recurso solicitado no existe.".to_string(),
            Self::Rejected { .. } | Self::Decode(_) | Self::MissingData(_) => {
                self.message().unwrap_or(fallback).to_string()
            }
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error)
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_exposes_its_first_message() {
        let error = BackendError::Rejected {
            messages: vec!["El email ya está registrado".to_string(), "otro".to_string()],
        };

        assert_eq!(error.message(), Some("El email ya está registrado"));
        assert_eq!(error.user_message("fallback"), "El email ya está registrado");
        assert_eq!(
            error.to_string(),
            "backend rejected the request: El email ya está registrado; otro"
        );
    }

    #[test]
    fn messageless_errors_use_the_fallback() {
        assert_eq!(
            BackendError::MissingData("login").user_message("Credenciales inválidas"),
            "Credenciales inválidas"
        );
        assert_eq!(BackendError::NotFound.message(), None);
    }
}
