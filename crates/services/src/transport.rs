//! How the game session reaches the level store and the solution checker.

use async_trait::async_trait;
use escape_core::model::{Language, Level};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::TransportError;
use crate::level_service::LevelService;
use crate::solution_service::{SolutionService, SolutionVerdict};

/// Body of `POST /validate-solution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionRequest {
    pub language: String,
    pub level: usize,
    pub solution: String,
}

/// Request/response exchange used by the game session.
///
/// One call at a time per learner action; no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns `TransportError::NotFound` for an unknown or empty track, or a
    /// transport failure.
    async fn fetch_levels(&self, language: Language) -> Result<Vec<Level>, TransportError>;

    /// # Errors
    ///
    /// Returns `TransportError::NotFound` if the level does not resolve, or a
    /// transport failure.
    async fn submit_solution(
        &self,
        language: Language,
        level: usize,
        solution: &str,
    ) -> Result<SolutionVerdict, TransportError>;
}

//
// ─── LOCAL ─────────────────────────────────────────────────────────────────────
//

/// Calls the services in-process, skipping HTTP.
#[derive(Clone)]
pub struct LocalTransport {
    levels: LevelService,
    solutions: SolutionService,
}

impl LocalTransport {
    #[must_use]
    pub fn new(levels: LevelService, solutions: SolutionService) -> Self {
        Self { levels, solutions }
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn fetch_levels(&self, language: Language) -> Result<Vec<Level>, TransportError> {
        Ok(self.levels.levels(language).await?)
    }

    async fn submit_solution(
        &self,
        language: Language,
        level: usize,
        solution: &str,
    ) -> Result<SolutionVerdict, TransportError> {
        Ok(self.solutions.submit(language, level, solution).await?)
    }
}

//
// ─── HTTP ──────────────────────────────────────────────────────────────────────
//

/// Client for the escape room HTTP API.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns `TransportError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_client(Client::new(), base_url)
    }

    /// # Errors
    ///
    /// Returns `TransportError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, TransportError> {
        let mut raw = base_url.trim().to_string();
        // Without the trailing slash `Url::join` would replace the last path segment.
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base = Url::parse(&raw)?;
        Ok(Self { client, base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn check_status(status: StatusCode) -> Result<(), TransportError> {
        if status == StatusCode::NOT_FOUND {
            return Err(TransportError::NotFound);
        }
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status));
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_levels(&self, language: Language) -> Result<Vec<Level>, TransportError> {
        let url = self.base.join(&format!("levels/{}", language.id()))?;
        let response = self.client.get(url).send().await?;
        Self::check_status(response.status())?;
        Ok(response.json().await?)
    }

    async fn submit_solution(
        &self,
        language: Language,
        level: usize,
        solution: &str,
    ) -> Result<SolutionVerdict, TransportError> {
        let url = self.base.join("validate-solution")?;
        let payload = SolutionRequest {
            language: language.id().to_string(),
            level,
            solution: solution.to_string(),
        };
        let response = self.client.post(url).json(&payload).send().await?;
        Self::check_status(response.status())?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let transport = HttpTransport::new("http://localhost:3000/api").unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:3000/api/");
        let joined = transport.base_url().join("levels/sql").unwrap();
        assert_eq!(joined.as_str(), "http://localhost:3000/api/levels/sql");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpTransport::new("not a url").unwrap_err();
        assert!(matches!(err, TransportError::InvalidBaseUrl(_)));
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        assert!(matches!(
            HttpTransport::check_status(StatusCode::NOT_FOUND),
            Err(TransportError::NotFound)
        ));
        assert!(matches!(
            HttpTransport::check_status(StatusCode::BAD_GATEWAY),
            Err(TransportError::HttpStatus(StatusCode::BAD_GATEWAY))
        ));
        assert!(HttpTransport::check_status(StatusCode::OK).is_ok());
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_failure() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let err = transport.fetch_levels(Language::Html).await.unwrap_err();
        assert!(!err.is_not_found());
    }
}
