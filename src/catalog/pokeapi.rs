//! PokeAPI-backed catalog.
//!
//! - Max id: `/pokemon-species?limit=1` gives the species count; the id of
//!   `/pokemon/{count}` is the highest id used for images.
//! - Image: `sprites.other["official-artwork"].front_default` of
//!   `/pokemon/{id}`.
//!
//! No retries or caching; a failed request surfaces as `Unavailable`.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{CatalogError, CatalogProvider};
use crate::core::PokemonId;

#[derive(Debug, Deserialize)]
struct SpeciesPage {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct Pokemon {
    id: u32,
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    other: OtherSprites,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: Artwork,
}

#[derive(Debug, Deserialize)]
struct Artwork {
    front_default: Option<String>,
}

fn parse_species_count(body: &str) -> Result<u32, CatalogError> {
    let page: SpeciesPage = serde_json::from_str(body).map_err(unavailable)?;
    Ok(page.count)
}

fn parse_pokemon_id(body: &str) -> Result<u32, CatalogError> {
    let pokemon: Pokemon = serde_json::from_str(body).map_err(unavailable)?;
    Ok(pokemon.id)
}

fn parse_artwork_url(body: &str) -> Result<Url, CatalogError> {
    let pokemon: Pokemon = serde_json::from_str(body).map_err(unavailable)?;
    let raw = pokemon
        .sprites
        .other
        .official_artwork
        .front_default
        .ok_or_else(|| CatalogError::Unavailable(format!("no artwork for #{}", pokemon.id)))?;
    Url::parse(&raw).map_err(unavailable)
}

fn unavailable(err: impl std::fmt::Display) -> CatalogError {
    CatalogError::Unavailable(err.to_string())
}

/// Catalog backed by the PokeAPI REST service.
#[derive(Clone, Debug)]
pub struct PokeApiCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl PokeApiCatalog {
    /// Create a catalog for an API base such as `https://pokeapi.co/api/v2`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(unavailable)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str) -> Result<String, CatalogError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "catalog request");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(unavailable)?
            .error_for_status()
            .map_err(unavailable)?;
        response.text().await.map_err(unavailable)
    }
}

#[async_trait]
impl CatalogProvider for PokeApiCatalog {
    async fn fetch_max_id(&self) -> Result<u32, CatalogError> {
        let count = parse_species_count(&self.get("pokemon-species?limit=1").await?)?;
        parse_pokemon_id(&self.get(&format!("pokemon/{count}")).await?)
    }

    async fn fetch_image_url(&self, id: PokemonId) -> Result<Url, CatalogError> {
        parse_artwork_url(&self.get(&format!("pokemon/{}", id.raw())).await?)
    }
}
