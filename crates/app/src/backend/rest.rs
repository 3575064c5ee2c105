//! REST client for the invoicing endpoints.

use std::{fmt, sync::Arc};

use reqwest::{Client, Method, header::AUTHORIZATION};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::backend::{BackendError, TokenSource};

/// HTTP client for the backend's REST API. Every call is authenticated.
#[derive(Clone)]
pub struct RestClient {
    base_url: String,
    http: Client,
    tokens: Arc<dyn TokenSource>,
}

impl fmt::Debug for RestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Client for the API rooted at `base_url`, e.g. `https://host/api`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
            tokens,
        }
    }

    /// `GET {base_url}{path}`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when no one is signed in, on transport
    /// failure, or for any non-2xx response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        self.send::<(), T>(Method::GET, path, None).await
    }

    /// `POST {base_url}{path}` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] when no one is signed in, on transport
    /// failure, or for any non-2xx response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, BackendError> {
        let token = self
            .tokens
            .bearer()
            .ok_or(BackendError::Unauthorized { status: 401 })?;

        let url = format!("{}{path}", self.base_url);

        debug!(%method, %url, "rest request");

        let mut request = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, token.authorization());

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        decode_response(status, &text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: ErrorMessage,
}

/// Turns a raw REST response into `T`, or the error its status and body describe.
pub(crate) fn decode_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, BackendError> {
    match status {
        200..=299 => Ok(serde_json::from_str(body)?),
        401 | 403 => Err(BackendError::Unauthorized { status }),
        404 => Err(BackendError::NotFound),
        _ => match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                message: ErrorMessage::One(message),
            }) => Err(BackendError::rejected(message)),
            Ok(ErrorBody {
                message: ErrorMessage::Many(messages),
            }) if !messages.is_empty() => Err(BackendError::Rejected { messages }),
            Ok(_) | Err(_) => Err(BackendError::rejected(format!(
                "request failed with status {status}"
            ))),
        },
    }
}
