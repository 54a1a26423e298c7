//! Catalog state and its persistence.
//!
//! [`Catalog`] is a plain owned value: mutations never touch storage.
//! [`CatalogStore`] pairs it with a [`KeyValueStore`] slot and writes the whole
//! collection back after every successful add or remove.

use qwat_storage::{KeyValueStore, StorageError};
use thiserror::Error;

use super::models::{Listing, NewListing};
use super::seed::seed_listings;
use crate::utils::now_millis;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode catalog: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Ordered listing collection. Order is insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    listings: Vec<Listing>,
    revision: u64,
}

impl Catalog {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            revision: 0,
        }
    }

    pub fn seed() -> Self {
        Self::new(seed_listings())
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    /// Bumped on every successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|listing| listing.id == id)
    }

    /// Append a listing built from `candidate`. A blank title is a silent
    /// no-op and yields `None`.
    pub fn add(&mut self, candidate: &NewListing, now_ms: u64) -> Option<&Listing> {
        let listing = candidate.into_listing(self.next_id(now_ms))?;
        self.listings.push(listing);
        self.revision += 1;
        self.listings.last()
    }

    /// Remove the listing with `id`, returning it. Unknown ids change nothing.
    pub fn remove(&mut self, id: &str) -> Option<Listing> {
        let index = self.listings.iter().position(|listing| listing.id == id)?;
        self.revision += 1;
        Some(self.listings.remove(index))
    }

    /// Timestamp-derived id, bumped past any id already in use.
    fn next_id(&self, now_ms: u64) -> String {
        let mut candidate = now_ms;
        while self.get(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }
}

/// Where the initial collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitSource {
    Persisted,
    Seed,
    /// The slot held something that did not parse; the seed was adopted and
    /// the slot left as is until the next mutation overwrites it.
    SeedAfterCorruptState,
}

/// Catalog bound to a storage slot.
pub struct CatalogStore<S> {
    catalog: Catalog,
    storage: S,
    slot: String,
    source: InitSource,
}

impl<S: KeyValueStore> CatalogStore<S> {
    /// Load the slot, falling back to the seed when it is empty or unreadable.
    pub fn initialize(storage: S, slot: impl Into<String>) -> Result<Self, CatalogError> {
        let slot = slot.into();

        let (catalog, source) = match storage.load(&slot)? {
            None => (Catalog::seed(), InitSource::Seed),
            Some(raw) => match serde_json::from_str::<Vec<Listing>>(&raw) {
                Ok(listings) => (Catalog::new(listings), InitSource::Persisted),
                Err(err) => {
                    tracing::warn!(
                        slot = %slot,
                        error = %err,
                        "persisted catalog did not parse; using seed listings"
                    );
                    (Catalog::seed(), InitSource::SeedAfterCorruptState)
                }
            },
        };

        tracing::info!(
            slot = %slot,
            listings = catalog.len(),
            source = ?source,
            "catalog initialized"
        );

        Ok(Self {
            catalog,
            storage,
            slot,
            source,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn listings(&self) -> &[Listing] {
        self.catalog.listings()
    }

    pub fn source(&self) -> InitSource {
        self.source
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Add a listing and persist. `Ok(None)` means the title was blank.
    pub fn add(&mut self, candidate: &NewListing) -> Result<Option<Listing>, CatalogError> {
        let Some(listing) = self.catalog.add(candidate, now_millis()).cloned() else {
            tracing::debug!("add ignored: blank title");
            return Ok(None);
        };

        self.persist()?;
        tracing::info!(id = %listing.id, title = %listing.title, "listing added");
        Ok(Some(listing))
    }

    /// Remove a listing and persist. `Ok(None)` means no listing had `id`.
    pub fn remove(&mut self, id: &str) -> Result<Option<Listing>, CatalogError> {
        let Some(removed) = self.catalog.remove(id) else {
            tracing::debug!(id, "remove ignored: unknown id");
            return Ok(None);
        };

        self.persist()?;
        tracing::info!(id, title = %removed.title, "listing removed");
        Ok(Some(removed))
    }

    /// Write the full collection to the slot.
    pub fn persist(&mut self) -> Result<(), CatalogError> {
        let encoded =
            serde_json::to_string(self.catalog.listings()).map_err(CatalogError::Encode)?;
        self.storage.save(&self.slot, &encoded)?;
        Ok(())
    }
}
