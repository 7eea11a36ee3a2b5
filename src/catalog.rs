//! The catalog snapshot: immutable entities laid out against a fixed column list.
//!
//! A [`Catalog`] is loaded once from the external store and then only ever
//! read. Every identification call borrows it, so one snapshot can serve any
//! number of concurrent sessions without locking.
//!
//! Entities are closed records: each has exactly one slot per catalog column,
//! holding either a normalised [`AttributeValue`] or null. Fields that only
//! matter for display (pictures, latin names, summaries) live in a separate
//! `details` map and never take part in matching.
//!
//! # Boundary checks
//!
//! [`Catalog::new`] rejects duplicate identities, blank names, and values for
//! attributes outside the column list. Once built, the catalog is valid by
//! construction and the algorithms never re-check it.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;

use crate::attribute::{AttributeSpec, AttributeValue, Column};
use crate::error::{Error, Result};

/// Stable numeric identity of a catalog entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ─── EntityRecord ───────────────────────────────────────────────────────────

/// Raw entity as handed over by a catalog provider, before validation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityRecord {
    /// Stable identity.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// `(attribute, raw comma-joined value)` pairs. `None` or blank means null.
    pub values: Vec<(String, Option<String>)>,
    /// Display-only fields.
    pub details: BTreeMap<String, String>,
}

impl EntityRecord {
    /// Start a record with no attribute values.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set a raw attribute value. A later value for the same attribute wins.
    pub fn with_value(mut self, attribute: impl Into<String>, raw: impl Into<String>) -> Self {
        self.values.push((attribute.into(), Some(raw.into())));
        self
    }

    /// Explicitly mark an attribute as null.
    pub fn with_null(mut self, attribute: impl Into<String>) -> Self {
        self.values.push((attribute.into(), None));
        self
    }

    /// Attach a display-only field.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

// ─── Entity ─────────────────────────────────────────────────────────────────

/// One validated catalog entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    id: EntityId,
    name: String,
    values: Vec<Option<AttributeValue>>,
    details: BTreeMap<String, String>,
}

impl Entity {
    /// Stable identity.
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored value in `column`, or `None` for null.
    pub fn value(&self, column: Column) -> Option<&AttributeValue> {
        self.values.get(column.index()).and_then(Option::as_ref)
    }

    /// Display-only fields.
    pub fn details(&self) -> &BTreeMap<String, String> {
        &self.details
    }
}

// ─── Catalog ────────────────────────────────────────────────────────────────

/// Read-only arena of entities sharing one column layout.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    columns: AttributeSpec,
    entities: Vec<Entity>,
}

impl Catalog {
    /// Validate provider records against `columns` and build the snapshot.
    ///
    /// Entity order is preserved: it is the tie-break order of the ranker.
    pub fn new<I>(columns: AttributeSpec, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let mut seen: HashSet<EntityId> = HashSet::new();
        let mut entities = Vec::new();

        for record in records {
            let id = EntityId(record.id);
            if !seen.insert(id) {
                return Err(Error::DuplicateEntity(id));
            }
            let name = record.name.trim();
            if name.is_empty() {
                return Err(Error::EmptyEntityName(id));
            }

            let mut values = alloc::vec![None; columns.len()];
            for (attribute, raw) in record.values {
                let slot = columns.position(&attribute).ok_or(Error::UnknownAttribute {
                    entity: id,
                    attribute,
                })?;
                values[slot] = raw.as_deref().and_then(AttributeValue::parse);
            }

            entities.push(Entity {
                id,
                name: name.to_string(),
                values,
                details: record.details,
            });
        }

        Ok(Self { columns, entities })
    }

    /// Column layout.
    pub fn columns(&self) -> &AttributeSpec {
        &self.columns
    }

    /// Entities in catalog order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// `true` for an empty catalog.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by identity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Column for an attribute name, if the catalog stores that attribute.
    pub fn column(&self, attribute: &str) -> Option<Column> {
        self.columns.position(attribute).map(Column)
    }

    /// Value of `attribute` for `entity`. Unknown attributes read as null.
    pub fn value<'e>(&self, entity: &'e Entity, attribute: &str) -> Option<&'e AttributeValue> {
        self.column(attribute).and_then(|column| entity.value(column))
    }

    /// Display fields plus every non-null attribute value of `entity`.
    pub fn display_fields(&self, entity: &Entity) -> BTreeMap<String, String> {
        let mut fields = entity.details.clone();
        for (index, name) in self.columns.iter().enumerate() {
            if let Some(value) = entity.value(Column(index)) {
                fields.insert(name.to_string(), value.as_str().to_string());
            }
        }
        fields
    }

    /// Every distinct token of each attribute in `attributes`, in first-seen order.
    ///
    /// This is the word list handed to the extraction layer so it can map free
    /// text onto values the catalog actually contains.
    pub fn vocabulary(&self, attributes: &AttributeSpec) -> Vec<(String, Vec<String>)> {
        attributes
            .iter()
            .map(|attribute| {
                let mut words: Vec<String> = Vec::new();
                if let Some(column) = self.column(attribute) {
                    for entity in &self.entities {
                        for token in entity.value(column).into_iter().flat_map(AttributeValue::tokens) {
                            if !words.iter().any(|w| w == token) {
                                words.push(token.to_string());
                            }
                        }
                    }
                }
                (attribute.to_string(), words)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> AttributeSpec {
        AttributeSpec::new(["plumage_colour", "size"]).unwrap()
    }

    #[test]
    fn test_values_are_slotted_by_column() {
        let catalog = Catalog::new(
            columns(),
            [EntityRecord::new(1, "Robin")
                .with_value("size", "Small")
                .with_detail("latin_name", "Erithacus rubecula")],
        )
        .unwrap();
        let robin = &catalog.entities()[0];
        assert_eq!(catalog.value(robin, "size").map(AttributeValue::as_str), Some("small"));
        assert!(catalog.value(robin, "plumage_colour").is_none());
        assert!(catalog.value(robin, "wingspan").is_none());
        assert_eq!(robin.details()["latin_name"], "Erithacus rubecula");
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let err = Catalog::new(
            columns(),
            [EntityRecord::new(7, "Wren"), EntityRecord::new(7, "Dunnock")],
        )
        .unwrap_err();
        assert_eq!(err, Error::DuplicateEntity(EntityId(7)));
    }

    #[test]
    fn test_unknown_attribute_is_rejected() {
        let err = Catalog::new(columns(), [EntityRecord::new(1, "Wren").with_value("call", "trill")])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownAttribute { attribute, .. } if attribute == "call"));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let err = Catalog::new(columns(), [EntityRecord::new(3, "  ")]).unwrap_err();
        assert_eq!(err, Error::EmptyEntityName(EntityId(3)));
    }

    #[test]
    fn test_blank_value_reads_as_null() {
        let catalog = Catalog::new(columns(), [EntityRecord::new(1, "Wren").with_value("size", " ")])
            .unwrap();
        assert!(catalog.value(&catalog.entities()[0], "size").is_none());
    }

    #[test]
    fn test_vocabulary_lists_distinct_tokens_in_first_seen_order() {
        let catalog = Catalog::new(
            columns(),
            [
                EntityRecord::new(1, "Magpie").with_value("plumage_colour", "black, white"),
                EntityRecord::new(2, "Robin").with_value("plumage_colour", "brown, red, white"),
                EntityRecord::new(3, "Wren"),
            ],
        )
        .unwrap();
        let vocab = catalog.vocabulary(&columns());
        assert_eq!(vocab[0].0, "plumage_colour");
        assert_eq!(vocab[0].1, vec!["black", "white", "brown", "red"]);
        assert!(vocab[1].1.is_empty());
    }

    #[test]
    fn test_display_fields_merge_details_and_values() {
        let catalog = Catalog::new(
            columns(),
            [EntityRecord::new(1, "Robin")
                .with_value("size", "small")
                .with_detail("picture", "robin.jpg")],
        )
        .unwrap();
        let fields = catalog.display_fields(&catalog.entities()[0]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["size"], "small");
        assert_eq!(fields["picture"], "robin.jpg");
    }
}
