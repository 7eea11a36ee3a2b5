//! Partial-credit match ranking over the whole catalog.
//!
//! Once asking more questions stops paying off, every entity gets a match
//! percentage against the current constraints:
//!
//! ```text
//! match_percentage = 100 × matched / total
//! ```
//!
//! `total` counts the constrained attributes that are also in the configured
//! attribute list. An attribute is matched when the entity's value is null,
//! the answer is empty, or the two token sets intersect. A map with nothing
//! recognised in it scores every entity 0: no evidence is not a perfect match.
//!
//! Percentages are rounded half-up to one decimal place in integer tenths.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::attribute::AttributeSpec;
use crate::catalog::{Catalog, Entity, EntityId};
use crate::constraint::ConstraintMap;

/// One ranked entity.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    /// Entity identity.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Match percentage in [0.0, 100.0], one decimal place.
    pub match_percentage: f64,
    /// Display fields and non-null attribute values.
    ///
    /// Attribute values appear in normalised form (trimmed, lower-cased,
    /// joined with `", "`), not as the provider spelled them. Display-only
    /// details are passed through untouched.
    pub fields: BTreeMap<String, String>,
}

/// Scores and ranks entities against a constraint map.
#[derive(Clone, Copy, Debug)]
pub struct MatchRanker<'a> {
    attributes: &'a AttributeSpec,
}

impl<'a> MatchRanker<'a> {
    /// Ranker that only counts attributes listed in `attributes`.
    pub fn new(attributes: &'a AttributeSpec) -> Self {
        Self { attributes }
    }

    /// `(matched, total)` feature counts for `entity`.
    pub fn feature_counts(
        &self,
        catalog: &Catalog,
        entity: &Entity,
        constraints: &ConstraintMap,
    ) -> (u32, u32) {
        let mut matched = 0u32;
        let mut total = 0u32;
        for (attribute, tokens) in constraints.iter() {
            if !self.attributes.contains(attribute) {
                continue;
            }
            total += 1;
            let credited = match catalog.value(entity, attribute) {
                None => true,
                Some(_) if tokens.is_empty() => true,
                Some(value) => value.shares_token_with(tokens),
            };
            if credited {
                matched += 1;
            }
        }
        (matched, total)
    }

    /// Match percentage of `entity`, rounded to one decimal place.
    pub fn match_percentage(
        &self,
        catalog: &Catalog,
        entity: &Entity,
        constraints: &ConstraintMap,
    ) -> f64 {
        let (matched, total) = self.feature_counts(catalog, entity, constraints);
        f64::from(percentage_tenths(matched, total)) / 10.0
    }

    /// Every catalog entity scored, best first, truncated to `limit`.
    ///
    /// The sort is stable, so equal percentages keep catalog order.
    pub fn rank(&self, catalog: &Catalog, constraints: &ConstraintMap, limit: usize) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = catalog
            .entities()
            .iter()
            .map(|entity| MatchResult {
                id: entity.id(),
                name: entity.name().to_string(),
                match_percentage: self.match_percentage(catalog, entity, constraints),
                fields: catalog.display_fields(entity),
            })
            .collect();
        results.sort_by(|a, b| b.match_percentage.total_cmp(&a.match_percentage));
        results.truncate(limit);
        results
    }
}

/// `100 × matched / total` in tenths of a percent, rounded half-up. Zero when `total == 0`.
fn percentage_tenths(matched: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (matched * 1000 + total / 2) / total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EntityRecord;

    fn spec() -> AttributeSpec {
        AttributeSpec::new(["color", "size", "habitat"]).unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::new(
            spec(),
            [
                EntityRecord::new(1, "Jay")
                    .with_value("color", " Blue,White ")
                    .with_value("size", "medium")
                    .with_detail("call", "Jay! Jay!"),
                EntityRecord::new(2, "Cardinal").with_value("color", "red").with_value("size", "small"),
                EntityRecord::new(3, "Mystery"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_percentage_tenths_rounding() {
        assert_eq!(percentage_tenths(1, 3), 333);
        assert_eq!(percentage_tenths(2, 3), 667);
        assert_eq!(percentage_tenths(1, 8), 125);
        assert_eq!(percentage_tenths(0, 0), 0);
        assert_eq!(percentage_tenths(4, 4), 1000);
    }

    #[test]
    fn test_empty_constraints_score_zero() {
        let catalog = catalog();
        let spec = spec();
        let ranker = MatchRanker::new(&spec);
        for entity in catalog.entities() {
            assert_eq!(ranker.match_percentage(&catalog, entity, &ConstraintMap::new()), 0.0);
        }
    }

    #[test]
    fn test_token_intersection_and_null_credit() {
        let catalog = catalog();
        let spec = spec();
        let ranker = MatchRanker::new(&spec);
        let constraints = ConstraintMap::new().with("color", "white").with("size", "small");
        let [jay, cardinal, mystery] = [&catalog.entities()[0], &catalog.entities()[1], &catalog.entities()[2]];
        assert_eq!(ranker.match_percentage(&catalog, jay, &constraints), 50.0);
        assert_eq!(ranker.match_percentage(&catalog, cardinal, &constraints), 50.0);
        assert_eq!(ranker.match_percentage(&catalog, mystery, &constraints), 100.0);
    }

    #[test]
    fn test_unrecognised_attributes_do_not_count() {
        let catalog = catalog();
        let spec = AttributeSpec::new(["color"]).unwrap();
        let ranker = MatchRanker::new(&spec);
        let constraints = ConstraintMap::new().with("color", "red").with("size", "medium");
        let jay = &catalog.entities()[0];
        assert_eq!(ranker.feature_counts(&catalog, jay, &constraints), (0, 1));
    }

    #[test]
    fn test_empty_answer_is_neutral_credit() {
        let catalog = catalog();
        let spec = spec();
        let ranker = MatchRanker::new(&spec);
        let mut constraints = ConstraintMap::new().with("color", "red");
        constraints.mark_asked("size");
        let jay = &catalog.entities()[0];
        assert_eq!(ranker.match_percentage(&catalog, jay, &constraints), 50.0);
    }

    #[test]
    fn test_rank_sorts_descending_with_stable_ties() {
        let catalog = catalog();
        let spec = spec();
        let ranker = MatchRanker::new(&spec);
        let constraints = ConstraintMap::new().with("color", "red").with("size", "medium");
        let ranked = ranker.rank(&catalog, &constraints, 10);
        let names: Vec<&str> = ranked.iter().map(|m| m.name.as_str()).collect();
        // Mystery 100, Jay 50, Cardinal 50
        assert_eq!(names, vec!["Mystery", "Jay", "Cardinal"]);
        assert_eq!(ranked[1].fields["color"], "blue, white");
        assert_eq!(ranked[1].fields["call"], "Jay! Jay!");
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let catalog = catalog();
        let spec = spec();
        let ranker = MatchRanker::new(&spec);
        assert_eq!(ranker.rank(&catalog, &ConstraintMap::new(), 2).len(), 2);
        assert!(ranker.rank(&catalog, &ConstraintMap::new(), 0).is_empty());
    }
}
