//! Errors raised at the catalog and configuration boundary.
//!
//! The identification algorithms themselves are total: they never fail on
//! well-typed input. Everything that can go wrong is caught when a catalog,
//! an attribute list, or a document is constructed.

use alloc::string::String;

use crate::catalog::EntityId;

/// Result type for boundary constructors.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violations by a catalog provider or configuration source.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An attribute name was blank.
    #[error("attribute name must not be empty")]
    EmptyAttributeName,

    /// An attribute name was listed twice.
    #[error("attribute `{0}` is listed more than once")]
    DuplicateAttribute(String),

    /// An entity set a value for an attribute the catalog has no column for.
    #[error("entity {entity} sets unknown attribute `{attribute}`")]
    UnknownAttribute {
        /// Offending entity.
        entity: EntityId,
        /// Attribute name as supplied.
        attribute: String,
    },

    /// Two entities share one identity.
    #[error("entity id {0} appears more than once in the catalog")]
    DuplicateEntity(EntityId),

    /// An entity has a blank display name.
    #[error("entity {0} has an empty display name")]
    EmptyEntityName(EntityId),

    /// A catalog document declared a format version this build cannot read.
    #[error("unsupported catalog document version {0}")]
    UnsupportedVersion(u16),
}
