//! Catalog documents: the portable form a catalog provider hands over.
//!
//! # Shape (JSON)
//!
//! ```text
//! {
//!   "version": 1,
//!   "columns": ["plumage_colour", "size", ...],
//!   "entities": [
//!     { "id": 7, "name": "Robin",
//!       "attributes": { "plumage_colour": "brown, red", "size": null },
//!       "details": { "latin_name": "Erithacus rubecula" } }
//!   ]
//! }
//! ```
//!
//! A document is only a transport shape. [`CatalogDocument::into_catalog`] runs
//! the same boundary checks as [`Catalog::new`], so malformed provider data is
//! rejected before any identification call sees it.
//!
//! # no_std
//!
//! This module requires the `serde` feature and only needs `alloc`.
//!
//! [`Catalog::new`]: crate::catalog::Catalog::new

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::attribute::{AttributeSpec, Column};
use crate::catalog::{Catalog, EntityRecord};
use crate::error::{Error, Result};

/// Current catalog document format version.
pub const CATALOG_DOCUMENT_VERSION: u16 = 1;

fn default_version() -> u16 {
    CATALOG_DOCUMENT_VERSION
}

/// A serialisable catalog snapshot.
///
/// ```rust,ignore
/// use ident_core::record::CatalogDocument;
///
/// let doc: CatalogDocument = serde_json::from_str(&json)?;
/// let catalog = doc.into_catalog()?;
/// ```
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct CatalogDocument {
    /// Format version. Defaults to [`CATALOG_DOCUMENT_VERSION`] when absent.
    #[serde(default = "default_version")]
    pub version: u16,
    /// Column layout.
    pub columns: Vec<String>,
    /// Entities in catalog order.
    pub entities: Vec<EntityDocument>,
}

/// Serialisable form of one entity.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
pub struct EntityDocument {
    /// Stable identity.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Raw comma-joined attribute values; `null` or missing means no data.
    #[serde(default)]
    pub attributes: BTreeMap<String, Option<String>>,
    /// Display-only fields.
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl From<EntityDocument> for EntityRecord {
    fn from(doc: EntityDocument) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            values: doc.attributes.into_iter().collect(),
            details: doc.details,
        }
    }
}

impl CatalogDocument {
    /// Capture a validated catalog. Values are written in normalised form.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let columns: Vec<String> = catalog.columns().iter().map(ToString::to_string).collect();
        let entities = catalog
            .entities()
            .iter()
            .map(|entity| EntityDocument {
                id: entity.id().0,
                name: entity.name().to_string(),
                attributes: columns
                    .iter()
                    .enumerate()
                    .map(|(index, name)| {
                        let value = entity.value(Column(index)).map(|v| v.as_str().to_string());
                        (name.clone(), value)
                    })
                    .collect(),
                details: entity.details().clone(),
            })
            .collect();

        Self {
            version: CATALOG_DOCUMENT_VERSION,
            columns,
            entities,
        }
    }

    /// Number of entities in the document.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Validate the document and build a [`Catalog`].
    pub fn into_catalog(self) -> Result<Catalog> {
        if self.version != CATALOG_DOCUMENT_VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }
        let columns = AttributeSpec::new(&self.columns)?;
        Catalog::new(columns, self.entities.into_iter().map(EntityRecord::from))
    }
}
