use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{PlanetError, Result};

/// A catalogued planet.
///
/// `id` is assigned by the store when the planet is first saved and is `None`
/// on an instance that has not been persisted yet. Missing and `null` text
/// fields deserialize as empty strings so that [`Planet::validate`] can reject
/// them with a single error path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub climate: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub terrain: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Planet {
    /// Build an unsaved planet.
    pub fn new(
        name: impl Into<String>,
        climate: impl Into<String>,
        terrain: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            climate: climate.into(),
            terrain: terrain.into(),
        }
    }

    /// Check the required-field invariants of a persisted planet.
    ///
    /// Every text field must contain something other than whitespace.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("climate", &self.climate),
            ("terrain", &self.terrain),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(PlanetError::Validation(format!(
                "{} must not be empty",
                missing.join(", ")
            )))
        }
    }
}

/// A planet-shaped filter template.
///
/// A field left as `None`, empty, or whitespace-only places no constraint on
/// the result, matching how [`Planet::validate`] treats blank values. There is
/// deliberately no `id` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetFilter {
    pub name: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
}

impl PlanetFilter {
    pub fn new(climate: Option<&str>, terrain: Option<&str>) -> Self {
        Self {
            name: None,
            climate: climate.map(str::to_owned),
            terrain: terrain.map(str::to_owned),
        }
    }
}

/// Query parameters accepted by `GET /planets`.
///
/// Only `terrain` and `climate` are recognised; anything else in the query
/// string is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlanetsQuery {
    pub terrain: Option<String>,
    pub climate: Option<String>,
}
