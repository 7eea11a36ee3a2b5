//! Attribute names, stored multi-value strings, and the canonical token form.
//!
//! Every attribute of an entity is categorical and may hold several values at
//! once, stored the way the catalog provider hands them over: one
//! comma-joined string such as `"black, white, grey"`. A stored value is never
//! an empty string: blank input is the null value (`None`), which is the
//! universal match everywhere in this crate.
//!
//! Both sides of every comparison (catalog values and user constraints) pass
//! through [`normalize_token`] once, at construction time, so the algorithms
//! themselves compare plain strings.
//!
//! # Invariants
//! - **Canonical form**: tokens are trimmed and lower-cased; empty tokens are dropped.
//! - **Null is absence**: [`AttributeValue::parse`] never yields an empty value.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};

/// Trim and lower-case a single token.
pub fn normalize_token(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Split a comma-joined string into normalised, non-empty tokens.
pub fn split_tokens(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(normalize_token)
        .filter(|token| !token.is_empty())
}

// ─── AttributeSpec ──────────────────────────────────────────────────────────

/// Ordered list of attribute names.
///
/// Used for two things: the column layout of a [`Catalog`](crate::catalog::Catalog)
/// and the list of attributes the session is allowed to ask about. Order has no
/// meaning beyond the tie-break between equally good questions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct AttributeSpec {
    names: Vec<String>,
}

impl AttributeSpec {
    /// Build a spec from attribute names, rejecting blank and repeated names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Self::default();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                return Err(Error::EmptyAttributeName);
            }
            if spec.contains(name) {
                return Err(Error::DuplicateAttribute(name.into()));
            }
            spec.names.push(name.into());
        }
        Ok(spec)
    }

    /// Build a spec from a known-good static list. Blank and repeated names are skipped.
    pub(crate) fn from_known(names: &[&str]) -> Self {
        let mut spec = Self::default();
        for name in names {
            if !name.is_empty() && !spec.contains(name) {
                spec.names.push((*name).into());
            }
        }
        spec
    }

    /// Attribute names in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when no attribute is configured.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `true` when `name` is one of the configured attributes.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Index of `name` in configured order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl TryFrom<Vec<String>> for AttributeSpec {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<AttributeSpec> for Vec<String> {
    fn from(spec: AttributeSpec) -> Self {
        spec.names
    }
}

/// Position of an attribute inside a catalog's column layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Column(pub(crate) usize);

impl Column {
    /// Zero-based slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

// ─── AttributeValue ─────────────────────────────────────────────────────────

/// A non-null stored attribute value: one or more tokens joined with `", "`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttributeValue(String);

impl AttributeValue {
    /// Normalise a raw comma-joined string. Returns `None` (null) when no token survives.
    pub fn parse(raw: &str) -> Option<Self> {
        let tokens: Vec<String> = split_tokens(raw).collect();
        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens.join(", ")))
        }
    }

    /// The normalised comma-joined form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Individual tokens in stored order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(", ")
    }

    /// Substring test against the whole joined value.
    ///
    /// `"bright yellow, green"` contains `"yellow"`. Question simulation and
    /// candidate filtering both use this, so compound values still match
    /// their simpler constituents.
    pub fn contains(&self, token: &str) -> bool {
        self.0.contains(token)
    }

    /// Tokens as a [`TokenSet`], e.g. to answer a question with this value.
    pub fn token_set(&self) -> TokenSet {
        self.tokens().collect()
    }

    /// Exact token intersection, used for match scoring.
    pub fn shares_token_with(&self, tokens: &TokenSet) -> bool {
        self.tokens().any(|token| tokens.contains(token))
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── TokenSet ───────────────────────────────────────────────────────────────

/// Ordered, de-duplicated set of normalised tokens: the desired values for one attribute.
///
/// Accepts either a single comma-joined string or a list of strings, since the
/// extraction layer produces both shapes. An empty set is a neutral answer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "TokenInput", into = "Vec<String>")
)]
pub struct TokenSet {
    tokens: Vec<String>,
}

impl TokenSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-joined string.
    pub fn from_raw(raw: &str) -> Self {
        let mut set = Self::new();
        set.extend_raw(raw);
        set
    }

    /// Add every token of a comma-joined string.
    pub fn extend_raw(&mut self, raw: &str) {
        for token in split_tokens(raw) {
            if !self.contains(&token) {
                self.tokens.push(token);
            }
        }
    }

    /// Set union, keeping `self`'s tokens first.
    pub fn union(&self, other: &TokenSet) -> TokenSet {
        let mut merged = self.clone();
        for token in other.iter() {
            if !merged.contains(token) {
                merged.tokens.push(token.into());
            }
        }
        merged
    }

    /// `true` when `token` (already normalised) is in the set.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// `true` for a neutral (empty) answer.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Owned copy of the tokens.
    pub fn to_vec(&self) -> Vec<String> {
        self.tokens.clone()
    }
}

impl From<&str> for TokenSet {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

impl From<String> for TokenSet {
    fn from(raw: String) -> Self {
        Self::from_raw(&raw)
    }
}

impl<S: AsRef<str>> From<Vec<S>> for TokenSet {
    fn from(values: Vec<S>) -> Self {
        values.into_iter().collect()
    }
}

impl<S: AsRef<str>, const N: usize> From<[S; N]> for TokenSet {
    fn from(values: [S; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TokenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.extend_raw(value.as_ref());
        }
        set
    }
}

impl From<TokenSet> for Vec<String> {
    fn from(set: TokenSet) -> Self {
        set.tokens
    }
}

/// Wire shapes accepted for a token set: a list, a single string, or null.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum TokenInput {
    Many(Vec<String>),
    One(String),
    Absent,
}

#[cfg(feature = "serde")]
impl From<TokenInput> for TokenSet {
    fn from(input: TokenInput) -> Self {
        match input {
            TokenInput::Many(values) => values.into(),
            TokenInput::One(raw) => raw.into(),
            TokenInput::Absent => TokenSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalises_tokens() {
        let value = AttributeValue::parse("  Black ,White,, GREY ").unwrap();
        assert_eq!(value.as_str(), "black, white, grey");
        assert_eq!(value.tokens().collect::<Vec<_>>(), vec!["black", "white", "grey"]);
    }

    #[test]
    fn test_blank_value_is_null() {
        assert!(AttributeValue::parse("").is_none());
        assert!(AttributeValue::parse(" , ,").is_none());
    }

    #[test]
    fn test_contains_is_substring_not_token_equality() {
        let value = AttributeValue::parse("bright yellow breast, green").unwrap();
        assert!(value.contains("yellow"));
        assert!(value.contains("green"));
        assert!(!value.contains("blue"));
    }

    #[test]
    fn test_shares_token_requires_whole_token() {
        let value = AttributeValue::parse("bright yellow, green").unwrap();
        assert!(!value.shares_token_with(&TokenSet::from("yellow")));
        assert!(value.shares_token_with(&TokenSet::from("Green, red")));
    }

    #[test]
    fn test_token_set_dedups_and_accepts_both_shapes() {
        let one = TokenSet::from("red, Red , blue");
        let many = TokenSet::from(vec!["red", "blue"]);
        assert_eq!(one, many);
        assert_eq!(one.len(), 2);
    }

    #[test]
    fn test_token_set_union_keeps_order() {
        let a = TokenSet::from("red, blue");
        let b = TokenSet::from(["blue", "green"]);
        assert_eq!(a.union(&b).to_vec(), vec!["red", "blue", "green"]);
    }

    #[test]
    fn test_spec_rejects_duplicates_and_blanks() {
        assert_eq!(
            AttributeSpec::new(["size", "size"]),
            Err(Error::DuplicateAttribute("size".into()))
        );
        assert_eq!(AttributeSpec::new(["size", " "]), Err(Error::EmptyAttributeName));
    }

    #[test]
    fn test_spec_preserves_order() {
        let spec = AttributeSpec::new(["size", "habitat", "beak_colour"]).unwrap();
        assert_eq!(spec.position("habitat"), Some(1));
        assert!(!spec.contains("tail_shape_1"));
        assert_eq!(spec.iter().collect::<Vec<_>>(), vec!["size", "habitat", "beak_colour"]);
    }
}
