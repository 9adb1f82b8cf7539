//! In-memory catalog.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use url::Url;

use super::{CatalogError, CatalogProvider};
use crate::core::PokemonId;

/// A catalog of `max_id` entries with images under a base URL.
///
/// Can be switched offline to exercise the unavailable path.
#[derive(Debug)]
pub struct StaticCatalog {
    max_id: u32,
    image_base: String,
    offline: AtomicBool,
}

impl StaticCatalog {
    /// Create a catalog with images at `{image_base}{id}.png`.
    #[must_use]
    pub fn new(max_id: u32, image_base: impl Into<String>) -> Self {
        Self {
            max_id,
            image_base: image_base.into(),
            offline: AtomicBool::new(false),
        }
    }

    /// A catalog with images under `memory://images/`.
    #[must_use]
    pub fn with_max_id(max_id: u32) -> Self {
        Self::new(max_id, "memory://images/")
    }

    /// Make every request fail (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), CatalogError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable("catalog is offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for StaticCatalog {
    async fn fetch_max_id(&self) -> Result<u32, CatalogError> {
        self.check_online()?;
        Ok(self.max_id)
    }

    async fn fetch_image_url(&self, id: PokemonId) -> Result<Url, CatalogError> {
        self.check_online()?;
        if id.raw() == 0 || id.raw() > self.max_id {
            return Err(CatalogError::Unavailable(format!("no entry {id}")));
        }
        Url::parse(&format!("{}{}.png", self.image_base, id.raw()))
            .map_err(|e| CatalogError::Unavailable(e.to_string()))
    }
}
