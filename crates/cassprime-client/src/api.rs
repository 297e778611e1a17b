//! HTTP client for the stub server's priming endpoints

use crate::config::ClientConfig;
use cassprime_model::{codec, DecodeError, EncodeError, PrimeKind, PrimingRequest};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Endpoint for query primes
pub const PRIME_QUERY_PATH: &str = "/prime-query-single";
/// Endpoint for prepared statement primes
pub const PRIME_PREPARED_PATH: &str = "/prime-prepared-single";

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Why an exchange with the admin API did not succeed
#[derive(Error, Debug)]
pub enum TransportFailure {
    #[error("server returned status {0}")]
    Status(StatusCode),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors that can occur when priming the stub server
#[derive(Error, Debug)]
pub enum PrimeError {
    #[error("Cannot send a {actual} prime to the {endpoint} endpoint")]
    WrongKind {
        endpoint: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Prime submission to {url} failed: {cause}")]
    SubmissionFailed {
        url: String,
        #[source]
        cause: TransportFailure,
    },
    #[error("Prime retrieval from {url} failed: {cause}")]
    RetrievalFailed {
        url: String,
        #[source]
        cause: TransportFailure,
    },
    #[error("Clearing primes at {url} failed: {cause}")]
    ClearFailed {
        url: String,
        #[source]
        cause: TransportFailure,
    },
    #[error("Failed to decode primes from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Get the admin API path serving primes of the given kind
pub fn endpoint_path(kind: PrimeKind) -> &'static str {
    match kind {
        PrimeKind::Query => PRIME_QUERY_PATH,
        PrimeKind::PreparedStatement => PRIME_PREPARED_PATH,
    }
}

/// HTTP client for the stub server's priming API
#[derive(Debug, Clone)]
pub struct PrimingClient {
    client: Client,
    base_url: String,
}

impl PrimingClient {
    /// Create a new priming client
    pub fn new(config: &ClientConfig) -> Result<Self, PrimeError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(PrimeError::Client)?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    /// Create a client for the given admin URL with default settings
    pub fn from_url(admin_url: &str) -> Result<Self, PrimeError> {
        Self::new(&ClientConfig::new(admin_url))
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, kind: PrimeKind) -> String {
        format!("{}{}", self.base_url, endpoint_path(kind))
    }

    /// Submit a prime to the endpoint matching its kind
    pub async fn prime(&self, request: &PrimingRequest) -> Result<(), PrimeError> {
        self.submit(request.kind(), request).await
    }

    /// Submit a query prime
    pub async fn prime_query(&self, request: &PrimingRequest) -> Result<(), PrimeError> {
        self.submit(PrimeKind::Query, request).await
    }

    /// Submit a prepared statement prime
    pub async fn prime_prepared_statement(
        &self,
        request: &PrimingRequest,
    ) -> Result<(), PrimeError> {
        self.submit(PrimeKind::PreparedStatement, request).await
    }

    async fn submit(&self, kind: PrimeKind, request: &PrimingRequest) -> Result<(), PrimeError> {
        if request.kind() != kind {
            return Err(PrimeError::WrongKind {
                endpoint: kind.label(),
                actual: request.kind().label(),
            });
        }

        let url = self.url(kind);
        let body = codec::encode(request)?;
        debug!("Priming: POST {} {}", url, body);

        let failed = |cause: TransportFailure| PrimeError::SubmissionFailed {
            url: url.clone(),
            cause,
        };
        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| failed(e.into()))?;
        expect_ok(resp.status(), &url).map_err(&failed)?;

        info!("Primed {} '{}'", kind.label(), request.when().text());
        Ok(())
    }

    /// List the query primes currently held by the server
    pub async fn retrieve_query_primes(&self) -> Result<Vec<PrimingRequest>, PrimeError> {
        self.retrieve(PrimeKind::Query).await
    }

    /// List the prepared statement primes currently held by the server
    pub async fn retrieve_prepared_primes(&self) -> Result<Vec<PrimingRequest>, PrimeError> {
        self.retrieve(PrimeKind::PreparedStatement).await
    }

    async fn retrieve(&self, kind: PrimeKind) -> Result<Vec<PrimingRequest>, PrimeError> {
        let url = self.url(kind);
        debug!("Priming: GET {}", url);

        let failed = |cause: TransportFailure| PrimeError::RetrievalFailed {
            url: url.clone(),
            cause,
        };
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| failed(e.into()))?;
        expect_ok(resp.status(), &url).map_err(&failed)?;
        let body = resp.text().await.map_err(|e| failed(e.into()))?;

        codec::decode_primes(&body, kind).map_err(|source| PrimeError::Decode {
            url: url.clone(),
            source,
        })
    }

    /// Remove all query primes
    pub async fn clear_query_primes(&self) -> Result<(), PrimeError> {
        self.clear(PrimeKind::Query).await
    }

    /// Remove all prepared statement primes
    pub async fn clear_prepared_primes(&self) -> Result<(), PrimeError> {
        self.clear(PrimeKind::PreparedStatement).await
    }

    /// Remove query primes, then prepared statement primes
    pub async fn clear_all_primes(&self) -> Result<(), PrimeError> {
        self.clear_query_primes().await?;
        self.clear_prepared_primes().await
    }

    async fn clear(&self, kind: PrimeKind) -> Result<(), PrimeError> {
        let url = self.url(kind);
        debug!("Priming: DELETE {}", url);

        let failed = |cause: TransportFailure| PrimeError::ClearFailed {
            url: url.clone(),
            cause,
        };
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| failed(e.into()))?;
        expect_ok(resp.status(), &url).map_err(&failed)?;

        info!("Cleared {} primes", kind.label());
        Ok(())
    }
}

/// The admin API answers 200 for every successful priming call
fn expect_ok(status: StatusCode, url: &str) -> Result<(), TransportFailure> {
    if status == StatusCode::OK {
        return Ok(());
    }
    warn!("Admin API {} returned {}", url, status);
    Err(TransportFailure::Status(status))
}
