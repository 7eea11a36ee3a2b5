//! Null-tolerant candidate filtering.
//!
//! One predicate serves both the authoritative candidate set and the
//! question simulation: an entity survives a constraint when its stored value
//! is null, or when the joined value contains at least one desired token.
//! Missing catalog data is never held against an entity, and an empty
//! answer never excludes anyone.

use alloc::vec::Vec;

use crate::attribute::{Column, TokenSet};
use crate::catalog::{Catalog, Entity};
use crate::constraint::ConstraintMap;

/// `true` when `entity` is consistent with `tokens` in `column`.
///
/// `column == None` means the catalog does not store the attribute, which
/// reads as null for every entity.
pub fn admits(entity: &Entity, column: Option<Column>, tokens: &TokenSet) -> bool {
    if tokens.is_empty() {
        return true;
    }
    match column.and_then(|c| entity.value(c)) {
        None => true,
        Some(value) => tokens.iter().any(|token| value.contains(token)),
    }
}

/// Every catalog entity consistent with all of `constraints`, in catalog order.
pub fn filter_candidates<'a>(catalog: &'a Catalog, constraints: &ConstraintMap) -> Vec<&'a Entity> {
    let active: Vec<(Option<Column>, &TokenSet)> = constraints
        .iter()
        .filter(|(_, tokens)| !tokens.is_empty())
        .map(|(attribute, tokens)| (catalog.column(attribute), tokens))
        .collect();

    catalog
        .entities()
        .iter()
        .filter(|entity| active.iter().all(|(column, tokens)| admits(entity, *column, tokens)))
        .collect()
}

/// Candidates that would remain if the user answered `token` for `column`.
pub fn filter_by_value<'a>(
    candidates: &[&'a Entity],
    column: Option<Column>,
    token: &str,
) -> Vec<&'a Entity> {
    candidates
        .iter()
        .copied()
        .filter(|entity| value_admits(entity, column, token))
        .collect()
}

/// Size of [`filter_by_value`] without building the list.
pub fn count_by_value(candidates: &[&Entity], column: Option<Column>, token: &str) -> usize {
    candidates
        .iter()
        .filter(|entity| value_admits(entity, column, token))
        .count()
}

fn value_admits(entity: &Entity, column: Option<Column>, token: &str) -> bool {
    match column.and_then(|c| entity.value(c)) {
        None => true,
        Some(value) => value.contains(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeSpec;
    use crate::catalog::EntityRecord;

    fn catalog() -> Catalog {
        Catalog::new(
            AttributeSpec::new(["color", "size"]).unwrap(),
            [
                EntityRecord::new(1, "Unknown"),
                EntityRecord::new(2, "Cardinal").with_value("color", "red").with_value("size", "small"),
                EntityRecord::new(3, "Jay").with_value("color", "blue").with_value("size", "medium"),
            ],
        )
        .unwrap()
    }

    fn names(entities: &[&Entity]) -> Vec<String> {
        entities.iter().map(|e| e.name().to_string()).collect()
    }

    #[test]
    fn test_null_counts_as_match() {
        let catalog = catalog();
        let filtered = filter_candidates(&catalog, &ConstraintMap::new().with("color", "red"));
        assert_eq!(names(&filtered), vec!["Unknown", "Cardinal"]);
    }

    #[test]
    fn test_any_token_suffices() {
        let catalog = catalog();
        let filtered = filter_candidates(&catalog, &ConstraintMap::new().with("color", "red, blue"));
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_empty_answer_never_filters() {
        let catalog = catalog();
        let mut constraints = ConstraintMap::new();
        constraints.mark_asked("color");
        assert_eq!(filter_candidates(&catalog, &constraints).len(), 3);
    }

    #[test]
    fn test_unknown_attribute_reads_as_null() {
        let catalog = catalog();
        let filtered = filter_candidates(&catalog, &ConstraintMap::new().with("habitat", "woodland"));
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn test_filter_by_value_and_count_agree() {
        let catalog = catalog();
        let all: Vec<&Entity> = catalog.entities().iter().collect();
        let column = catalog.column("size");
        let small = filter_by_value(&all, column, "small");
        assert_eq!(names(&small), vec!["Unknown", "Cardinal"]);
        assert_eq!(count_by_value(&all, column, "small"), 2);
        assert_eq!(count_by_value(&all, column, "huge"), 1);
    }
}
