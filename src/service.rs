//! Planet operations on top of a [`PlanetStore`].

use std::sync::Arc;

use crate::db::{Database, PlanetStore};
use crate::error::Result;
use crate::models::{Planet, PlanetFilter};
use crate::query::build_predicate;

/// Entry point for every planet operation. Holds no state besides the store.
pub struct PlanetService<S = Database> {
    store: Arc<S>,
}

impl<S> Clone for PlanetService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: PlanetStore> PlanetService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Persist a new planet. Any id on the input is discarded.
    pub fn create(&self, planet: Planet) -> Result<Planet> {
        let created = self.store.save(Planet { id: None, ..planet })?;
        tracing::info!(id = ?created.id, name = %created.name, "Created planet");
        Ok(created)
    }

    pub fn get(&self, id: i64) -> Result<Option<Planet>> {
        tracing::debug!(id, "Fetching planet by id");
        self.store.find_by_id(id)
    }

    pub fn get_by_name(&self, name: &str) -> Result<Option<Planet>> {
        tracing::debug!(name, "Fetching planet by name");
        self.store.find_by_name(name)
    }

    /// List planets, narrowed by whichever of `terrain` and `climate` are
    /// non-empty. Both must match when both are given.
    pub fn list(&self, terrain: Option<&str>, climate: Option<&str>) -> Result<Vec<Planet>> {
        let predicate = build_predicate(&PlanetFilter::new(climate, terrain));
        let planets = self.store.find_all(&predicate)?;
        tracing::debug!(
            conjuncts = predicate.conjuncts().len(),
            found = planets.len(),
            "Listed planets"
        );
        Ok(planets)
    }

    pub fn remove(&self, id: i64) -> Result<()> {
        self.store.delete_by_id(id)?;
        tracing::info!(id, "Removed planet");
        Ok(())
    }
}
