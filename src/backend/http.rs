use crate::backend::traits::SearchBackend;
use crate::backend::types::{HomeFeed, SearchParams, SearchResponse, TrendingResponse};
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::models::FilterCriteria;
use crate::session::{AuthProvider, LoginGrant, LoginRequest, LoginResponse, Session};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Search backend reached over HTTP
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
    session: Session,
}

impl HttpBackend {
    /// Create a backend for the configured service
    pub fn new(config: ClientConfig, session: Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        info!("Using search service at {}", config.api_base);
        Ok(Self {
            client,
            config,
            session,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(self.config.endpoint(path));
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, TransportError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("{} returned status: {}", what, status);
            return Err(TransportError::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        debug!("Downloaded {} bytes from {}", body.len(), what);
        Ok(serde_json::from_str(&body)?)
    }
}

/// Pull the `detail` field out of an error body; non-string details are
/// rendered as JSON
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, params: &SearchParams) -> Result<SearchResponse, TransportError> {
        debug!("Searching page {} with {:?}", params.page, params);
        self.fetch_json(self.get("/search").query(params), "search")
            .await
    }

    async fn trending(&self) -> Result<Vec<FilterCriteria>, TransportError> {
        let response: TrendingResponse = self.fetch_json(self.get("/trending"), "trending").await?;
        Ok(response.items)
    }

    async fn home_feed(&self) -> Result<HomeFeed, TransportError> {
        self.fetch_json(self.get("/home-feed"), "home feed").await
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}

#[async_trait]
impl AuthProvider for HttpBackend {
    async fn login(&self, identity: &str, secret: &str) -> Result<LoginGrant, TransportError> {
        let body = LoginRequest {
            email: identity.to_string(),
            password: secret.to_string(),
        };
        let request = self.client.post(self.config.endpoint("/auth/login")).json(&body);
        let response: LoginResponse = self.fetch_json(request, "login").await?;
        response.into_grant()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_extracted_from_error_bodies() {
        assert_eq!(
            extract_detail(r#"{"detail": "Servicio no disponible"}"#).as_deref(),
            Some("Servicio no disponible")
        );
        assert_eq!(
            extract_detail(r#"{"detail": [{"loc": ["page"]}]}"#).as_deref(),
            Some(r#"[{"loc":["page"]}]"#)
        );
        assert_eq!(extract_detail(r#"{"detail": null}"#), None);
        assert_eq!(extract_detail("<html>502</html>"), None);
    }

    #[tokio::test]
    async fn login_against_unreachable_service_leaves_session_empty() {
        let config = ClientConfig {
            api_base: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
            ..ClientConfig::default()
        };
        let session = Session::new();
        let backend = HttpBackend::new(config, session.clone()).unwrap();

        let result = session.login(&backend, "ana@example.pe", "secreto").await;
        assert!(matches!(result, Err(TransportError::Request(_))));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn builds_from_default_config() {
        let backend = HttpBackend::new(ClientConfig::default(), Session::new()).unwrap();
        assert_eq!(backend.backend_name(), "http");
    }
}
