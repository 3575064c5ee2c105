//! Backend Config

use clap::Args;

use crate::config::ConfigError;

/// Backend endpoint settings.
#[derive(Debug, Clone, Default, Args)]
pub struct BackendConfig {
    /// GraphQL endpoint; defaults to `{origin}/graphql`
    #[arg(long, env = "PEDIDO_LISTO_GRAPHQL_URL")]
    pub graphql_url: Option<String>,

    /// REST API root; defaults to `{origin}/api`
    #[arg(long, env = "PEDIDO_LISTO_REST_URL")]
    pub rest_url: Option<String>,
}

/// Resolved endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GraphQL endpoint.
    pub graphql: String,

    /// REST API root.
    pub rest: String,
}

impl BackendConfig {
    /// Fills unset endpoints in from the page `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEndpoint`] when an endpoint is unset and
    /// there is no origin.
    pub fn endpoints(&self, origin: Option<&str>) -> Result<Endpoints, ConfigError> {
        let origin = origin.map(|origin| origin.trim_end_matches('/'));

        let resolve = |configured: Option<&String>, path: &str, name: &'static str| {
            configured
                .cloned()
                .or_else(|| origin.map(|origin| format!("{origin}{path}")))
                .ok_or(ConfigError::MissingEndpoint(name))
        };

        Ok(Endpoints {
            graphql: resolve(self.graphql_url.as_ref(), "/graphql", "GraphQL")?,
            rest: resolve(self.rest_url.as_ref(), "/api", "REST")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn unset_endpoints_follow_the_origin() -> TestResult {
        let endpoints = BackendConfig::default().endpoints(Some("https://pedidolisto.ec/"))?;

        assert_eq!(endpoints.graphql, "https://pedidolisto.ec/graphql");
        assert_eq!(endpoints.rest, "https://pedidolisto.ec/api");

        Ok(())
    }

    #[test]
    fn configured_endpoints_win() -> TestResult {
        let config = BackendConfig {
            graphql_url: Some("http://localhost:3000/graphql".to_string()),
            rest_url: None,
        };

        let endpoints = config.endpoints(Some("http://localhost:8080"))?;

        assert_eq!(endpoints.graphql, "http://localhost:3000/graphql");
        assert_eq!(endpoints.rest, "http://localhost:8080/api");

        Ok(())
    }

    #[test]
    fn no_origin_and_no_url_is_an_error() {
        let result = BackendConfig::default().endpoints(None);

        assert!(matches!(result, Err(ConfigError::MissingEndpoint("GraphQL"))));
    }
}
