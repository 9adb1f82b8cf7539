//! Image catalog access.
//!
//! The session only needs two things from a catalog: how many entries it
//! has, and where an entry's image lives. `CatalogProvider` is that seam.
//!
//! - `StaticCatalog`: in-memory, for tests and offline play
//! - `PokeApiCatalog`: the public PokeAPI over HTTP

pub mod pokeapi;
pub mod static_catalog;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::core::PokemonId;

pub use pokeapi::PokeApiCatalog;
pub use static_catalog::StaticCatalog;

/// Catalog failures. All of them are recoverable by retrying later.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Source of catalog size and image locations.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Highest valid id; ids run from 1 to this value.
    async fn fetch_max_id(&self) -> Result<u32, CatalogError>;

    /// Image location for an id.
    async fn fetch_image_url(&self, id: PokemonId) -> Result<Url, CatalogError>;
}

#[async_trait]
impl<T: CatalogProvider + ?Sized> CatalogProvider for std::sync::Arc<T> {
    async fn fetch_max_id(&self) -> Result<u32, CatalogError> {
        (**self).fetch_max_id().await
    }

    async fn fetch_image_url(&self, id: PokemonId) -> Result<Url, CatalogError> {
        (**self).fetch_image_url(id).await
    }
}
