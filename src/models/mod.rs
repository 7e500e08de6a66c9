//! Domain models for the planet catalogue.
//!
//! - [`Planet`]: the persisted entity. Its `id` is owned by the store.
//! - [`PlanetFilter`]: a partially populated template used to narrow listings.
//! - [`ListPlanetsQuery`]: the query string accepted by the listing endpoint.

mod planet;

pub use planet::*;
