//! GraphQL client.

use std::{fmt, sync::Arc};

use reqwest::{Client, header::AUTHORIZATION};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::debug;

use crate::backend::{BackendError, TokenSource};

/// A GraphQL document plus the name of the root field it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operation {
    /// Root field whose value is the operation's result.
    pub field: &'static str,

    /// Query or mutation text.
    pub document: &'static str,
}

/// HTTP client for the backend's GraphQL endpoint.
#[derive(Clone)]
pub struct GraphqlClient {
    endpoint: String,
    http: Client,
    tokens: Arc<dyn TokenSource>,
}

impl fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphqlClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GraphqlClient {
    /// Client posting to `endpoint`, attaching the token `tokens` yields.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: Client::new(),
            tokens,
        }
    }

    /// Runs `operation` and decodes its root field as `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`BackendError`] on transport failure, a non-empty `errors`
    /// array, an authorization failure, or a body that doesn't decode.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        operation: Operation,
        variables: Value,
    ) -> Result<T, BackendError> {
        debug!(field = operation.field, "graphql request");

        let body = serde_json::json!({
            "query": operation.document,
            "variables": variables,
        });

        let mut request = self.http.post(&self.endpoint).json(&body);

        if let Some(token) = self.tokens.bearer() {
            request = request.header(AUTHORIZATION, token.authorization());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        decode_response(status, &text, operation.field)
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<Map<String, Value>>,

    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,

    #[serde(default)]
    extensions: Option<Value>,
}

impl GraphqlError {
    fn code(&self) -> Option<&str> {
        self.extensions.as_ref()?.get("code")?.as_str()
    }

    /// Validation pipes nest a list of messages under `originalError`.
    fn messages(&self) -> Vec<String> {
        let nested = self
            .extensions
            .as_ref()
            .and_then(|extensions| extensions.pointer("/originalError/message"))
            .and_then(Value::as_array)
            .map(|messages| {
                messages
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|messages| !messages.is_empty());

        nested.unwrap_or_else(|| vec![self.message.clone()])
    }
}

/// Turns a raw GraphQL HTTP response into the value of `field`.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    field: &'static str,
) -> Result<T, BackendError> {
    if matches!(status, 401 | 403) {
        return Err(BackendError::Unauthorized { status });
    }

    let response: GraphqlResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(error) if (200..300).contains(&status) => return Err(BackendError::Decode(error)),
        Err(_not_json) => {
            return Err(BackendError::rejected(format!(
                "request failed with status {status}"
            )));
        }
    };

    if !response.errors.is_empty() {
        let denied = response
            .errors
            .iter()
            .any(|error| matches!(error.code(), Some("UNAUTHENTICATED" | "FORBIDDEN")));

        if denied {
            return Err(BackendError::Unauthorized { status });
        }

        return Err(BackendError::Rejected {
            messages: response
                .errors
                .iter()
                .flat_map(GraphqlError::messages)
                .collect(),
        });
    }

    let value = response
        .data
        .and_then(|mut data| data.remove(field))
        .filter(|value| !value.is_null())
        .ok_or(BackendError::MissingData(field))?;

    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Created {
        id: i64,
    }

    #[test]
    fn decodes_the_root_field() -> TestResult {
        let created: Created =
            decode_response(200, r#"{"data":{"createPedido":{"id":12}}}"#, "createPedido")?;

        assert_eq!(created, Created { id: 12 });

        Ok(())
    }

    #[test]
    fn errors_array_becomes_a_rejection_with_its_first_message() {
        let result = decode_response::<Created>(
            200,
            r#"{"data":null,"errors":[{"message":"El email ya está registrado"},{"message":"x"}]}"#,
            "register",
        );

        let message = result.as_ref().err().and_then(BackendError::message);

        assert_eq!(message, Some("El email ya está registrado"));
    }

    #[test]
    fn nested_validation_messages_are_flattened() {
        let result = decode_response::<Created>(
            200,
            r#"{"errors":[{"message":"Bad Request Exception","extensions":{"code":"BAD_REQUEST",
                "originalError":{"message":["precio must not be less than 0","nombreItem should not be empty"]}}}]}"#,
            "createPlatillo",
        );

        assert!(
            matches!(
                result,
                Err(BackendError::Rejected { ref messages }) if messages.len() == 2
            ),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn unauthenticated_code_maps_to_unauthorized() {
        let result = decode_response::<Created>(
            200,
            r#"{"errors":[{"message":"Unauthorized","extensions":{"code":"UNAUTHENTICATED"}}]}"#,
            "pedidos",
        );

        assert!(
            matches!(result, Err(BackendError::Unauthorized { status: 200 })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn http_auth_statuses_map_to_unauthorized() {
        let result = decode_response::<Created>(403, "", "pedidos");

        assert!(
            matches!(result, Err(BackendError::Unauthorized { status: 403 })),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn null_field_is_missing_data() {
        let result = decode_response::<Created>(200, r#"{"data":{"login":null}}"#, "login");

        assert!(
            matches!(result, Err(BackendError::MissingData("login"))),
            "unexpected result: {result:?}"
        );
    }

    #[test]
    fn non_json_failures_report_the_status() {
        let result = decode_response::<Created>(502, "<html>Bad gateway</html>", "pedidos");

        assert_eq!(
            result.err().and_then(|error| error.message().map(str::to_string)),
            Some("request failed with status 502".to_string())
        );
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let result = decode_response::<Created>(200, "{", "pedidos");

        assert!(
            matches!(result, Err(BackendError::Decode(_))),
            "unexpected result: {result:?}"
        );
    }
}
