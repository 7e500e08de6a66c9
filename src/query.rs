//! Filter query construction.
//!
//! A [`PlanetFilter`] is turned into an explicit list of `field = value`
//! conjuncts. Absent and blank fields are skipped, so a filter with nothing
//! set matches every planet. Comparisons fold case with full Unicode
//! lowercasing, both in SQL (through the [`FOLD_FUNCTION`] the store
//! registers on its connection) and when evaluated in memory.

use crate::models::{Planet, PlanetFilter};

/// Name of the SQL scalar function that applies [`fold_case`] to a column.
pub const FOLD_FUNCTION: &str = "fold_case";

/// Case folding shared by SQL rendering and in-memory matching.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// A planet column that can take part in a filter. `id` is never filterable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetField {
    Name,
    Climate,
    Terrain,
}

impl PlanetField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Climate => "climate",
            Self::Terrain => "terrain",
        }
    }

    fn value_of<'a>(&self, planet: &'a Planet) -> &'a str {
        match self {
            Self::Name => &planet.name,
            Self::Climate => &planet.climate,
            Self::Terrain => &planet.terrain,
        }
    }
}

/// One `field = value` term of a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conjunct {
    pub field: PlanetField,
    pub value: String,
}

/// A conjunction of case-insensitive equality terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    conjuncts: Vec<Conjunct>,
}

impl Predicate {
    pub fn conjuncts(&self) -> &[Conjunct] {
        &self.conjuncts
    }

    pub fn is_unconstrained(&self) -> bool {
        self.conjuncts.is_empty()
    }

    /// Evaluate the predicate against a planet without touching the store.
    pub fn matches(&self, planet: &Planet) -> bool {
        self.conjuncts
            .iter()
            .all(|c| fold_case(c.field.value_of(planet)) == fold_case(&c.value))
    }

    /// Render the predicate as a SQL `WHERE` body and its positional parameters.
    ///
    /// Parameters are already folded; the clause folds the column side.
    /// Returns an empty clause when there is nothing to constrain.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let clause = self
            .conjuncts
            .iter()
            .map(|c| format!("{}({}) = ?", FOLD_FUNCTION, c.field.column()))
            .collect::<Vec<_>>()
            .join(" AND ");
        let params = self.conjuncts.iter().map(|c| fold_case(&c.value)).collect();
        (clause, params)
    }
}

/// Build the predicate for a filter template.
pub fn build_predicate(filter: &PlanetFilter) -> Predicate {
    let fields = [
        (PlanetField::Name, &filter.name),
        (PlanetField::Climate, &filter.climate),
        (PlanetField::Terrain, &filter.terrain),
    ];

    let conjuncts = fields
        .into_iter()
        .filter_map(|(field, value)| match value.as_deref() {
            Some(v) if !v.trim().is_empty() => Some(Conjunct {
                field,
                value: v.to_string(),
            }),
            _ => None,
        })
        .collect();

    Predicate { conjuncts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tatooine() -> Planet {
        Planet {
            id: Some(1),
            ..Planet::new("Tatooine", "arid", "desert")
        }
    }

    #[test]
    fn empty_filter_is_unconstrained() {
        let predicate = build_predicate(&PlanetFilter::default());
        assert!(predicate.is_unconstrained());
        assert!(predicate.matches(&tatooine()));
        assert_eq!(predicate.to_sql(), (String::new(), vec![]));
    }

    #[test]
    fn empty_strings_are_skipped() {
        let filter = PlanetFilter {
            name: Some(String::new()),
            climate: Some(String::new()),
            terrain: None,
        };
        assert!(build_predicate(&filter).is_unconstrained());
    }

    #[test]
    fn supplied_fields_become_conjuncts_in_column_order() {
        let filter = PlanetFilter::new(Some("arid"), Some("desert"));
        let predicate = build_predicate(&filter);

        let fields: Vec<_> = predicate.conjuncts().iter().map(|c| c.field).collect();
        assert_eq!(fields, vec![PlanetField::Climate, PlanetField::Terrain]);

        let (clause, params) = predicate.to_sql();
        assert_eq!(clause, "fold_case(climate) = ? AND fold_case(terrain) = ?");
        assert_eq!(params, vec!["arid".to_string(), "desert".to_string()]);
    }

    #[test]
    fn matching_ignores_case() {
        let predicate = build_predicate(&PlanetFilter::new(Some("ARID"), Some("Desert")));
        assert!(predicate.matches(&tatooine()));
    }

    #[test]
    fn matching_folds_non_ascii_letters() {
        let ilum = Planet::new("Ilum", "ÉTÉ", "glacier");
        let predicate = build_predicate(&PlanetFilter::new(Some("été"), None));
        assert!(predicate.matches(&ilum));
        assert_eq!(predicate.to_sql().1, vec!["été".to_string()]);

        let upper = build_predicate(&PlanetFilter::new(Some("ÉTÉ"), None));
        assert_eq!(upper.to_sql().1, vec!["été".to_string()]);
    }

    #[test]
    fn whitespace_only_values_are_skipped() {
        let filter = PlanetFilter::new(Some(" "), Some("\t"));
        assert!(build_predicate(&filter).is_unconstrained());
    }

    #[test]
    fn all_conjuncts_must_match() {
        let predicate = build_predicate(&PlanetFilter::new(Some("arid"), Some("tundra")));
        assert!(!predicate.matches(&tatooine()));
    }

    #[test]
    fn name_is_filterable_when_set_on_the_template() {
        let filter = PlanetFilter {
            name: Some("tatooine".into()),
            ..PlanetFilter::default()
        };
        let predicate = build_predicate(&filter);
        assert_eq!(predicate.to_sql().0, "fold_case(name) = ?");
        assert!(predicate.matches(&tatooine()));
    }

    #[test]
    fn building_is_deterministic() {
        let filter = PlanetFilter::new(Some("frozen"), None);
        assert_eq!(build_predicate(&filter), build_predicate(&filter));
    }
}
