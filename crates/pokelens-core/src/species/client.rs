//! Species data source trait and the PokeAPI implementation.

use super::upstream::{Pokemon, PokemonSpecies};
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Where species data comes from.
#[async_trait]
pub trait SpeciesSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Fetch the core record (types, stats, abilities, sprites).
    async fn pokemon(&self, id: u32) -> PipelineResult<Pokemon>;

    /// Fetch species metadata (localized flavor texts).
    async fn species(&self, id: u32) -> PipelineResult<PokemonSpecies>;
}

/// PokeAPI REST client.
pub struct PokeApiClient {
    endpoint: String,
    client: reqwest::Client,
}

impl PokeApiClient {
    pub fn new(endpoint: &str, timeout: Duration) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokelens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::Species {
                message: format!("Failed to build PokeAPI HTTP client: {e}"),
                status_code: None,
            })?;

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, id: u32) -> PipelineResult<T> {
        let url = format!("{}/{resource}/{id}", self.endpoint);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::Species {
                message: format!("PokeAPI request to {url} failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Species {
                message: format!("PokeAPI HTTP {status} for {resource}/{id}"),
                status_code: Some(status.as_u16()),
            });
        }

        resp.json().await.map_err(|e| PipelineError::Species {
            message: format!("Failed to parse PokeAPI {resource}/{id}: {e}"),
            status_code: None,
        })
    }
}

#[async_trait]
impl SpeciesSource for PokeApiClient {
    fn name(&self) -> &str {
        "pokeapi"
    }

    async fn pokemon(&self, id: u32) -> PipelineResult<Pokemon> {
        self.get_json("pokemon", id).await
    }

    async fn species(&self, id: u32) -> PipelineResult<PokemonSpecies> {
        self.get_json("pokemon-species", id).await
    }
}
