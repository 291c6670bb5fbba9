//! reqwest implementation of [`CatalogGateway`].
//!
//! One `reqwest::Client` with a cookie store is created per gateway, so the
//! session cookie set by `POST /auth/login` rides along on every later call.

use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use catalog::{Dog, DogId, FilterCriteria, Location, MatchResult, SearchResult, ZipCode};

use crate::config::GatewayConfig;
use crate::{CatalogGateway, GatewayError, Operation, Result};

#[derive(Serialize)]
struct LoginBody<'a> {
    name: &'a str,
    email: &'a str,
}

/// HTTP client for the catalog service.
///
/// Cloning is cheap and clones share the same connection pool and cookies.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Build a gateway from config.
    ///
    /// Fails when the base URL does not parse or the TLS backend cannot be
    /// initialised. No request is made here.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url).map_err(|e| GatewayError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: "not a base URL".to_string(),
            });
        }

        let client = Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("could not build HTTP client: {e}"),
            })?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!("Catalog gateway configured for {}", base_url);

        Ok(Self { client, base_url })
    }

    /// Get the address of the catalog service this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        operation: Operation,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| network_error(operation, e))?;
        ensure_success(operation, response)
    }
}

fn network_error(operation: Operation, e: reqwest::Error) -> GatewayError {
    error!("{} request failed: {}", operation, e);
    GatewayError::Network {
        operation,
        message: e.to_string(),
    }
}

fn ensure_success(operation: Operation, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    error!("{} rejected with status {}", operation, status);
    Err(GatewayError::Status {
        operation,
        status: status.as_u16(),
    })
}

async fn decode<T: DeserializeOwned>(operation: Operation, response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        error!("Could not decode {} response: {}", operation, e);
        GatewayError::Decode {
            operation,
            message: e.to_string(),
        }
    })
}

#[async_trait]
impl CatalogGateway for HttpGateway {
    async fn login(&self, name: &str, email: &str) -> Result<()> {
        debug!("Logging in as {} <{}>", name, email);
        self.post_json(Operation::Login, "/auth/login", &LoginBody { name, email })
            .await?;
        Ok(())
    }

    async fn logout(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("/auth/logout"))
            .send()
            .await
            .map_err(|e| network_error(Operation::Logout, e))?;
        ensure_success(Operation::Logout, response)?;
        Ok(())
    }

    async fn breeds(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.url("/dogs/breeds"))
            .send()
            .await
            .map_err(|e| network_error(Operation::Breeds, e))?;
        let response = ensure_success(Operation::Breeds, response)?;
        decode(Operation::Breeds, response).await
    }

    async fn search(&self, criteria: &FilterCriteria) -> Result<SearchResult> {
        let query = criteria.to_query();
        debug!("Searching with {} query parameters", query.len());

        let response = self
            .client
            .get(self.url("/dogs/search"))
            .query(&query)
            .send()
            .await
            .map_err(|e| network_error(Operation::Search, e))?;
        let response = ensure_success(Operation::Search, response)?;
        decode(Operation::Search, response).await
    }

    async fn fetch_dogs(&self, ids: &[DogId]) -> Result<Vec<Dog>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        debug!("Hydrating {} dog ids", ids.len());
        let response = self.post_json(Operation::Hydrate, "/dogs", ids).await?;
        decode(Operation::Hydrate, response).await
    }

    async fn match_dog(&self, ids: &[DogId]) -> Result<MatchResult> {
        debug!("Requesting a match from {} favorites", ids.len());
        let response = self.post_json(Operation::Match, "/dogs/match", ids).await?;
        decode(Operation::Match, response).await
    }

    async fn locations(&self, zip_codes: &[ZipCode]) -> Result<Vec<Location>> {
        if zip_codes.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .post_json(Operation::Locations, "/locations", zip_codes)
            .await?;
        decode(Operation::Locations, response).await
    }
}
