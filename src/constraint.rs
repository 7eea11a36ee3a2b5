//! Constraint maps: what the user has said so far, attribute by attribute.
//!
//! A [`ConstraintMap`] is rebuilt by the caller on every turn of a
//! conversation and handed to the session by reference. Its key set is also
//! the set of attributes already asked about, which is what stops the
//! selector from repeating a question. An attribute can be present with an
//! empty [`TokenSet`]: the question was asked, the answer carried no usable
//! value, and the attribute is neutral for filtering and scoring.
//!
//! Text the extraction layer could not map onto any known attribute is kept
//! in a separate notes bucket (the reserved [`FREE_FORM_KEY`]). Notes are
//! carried along for summaries and never matched against the catalog.
//!
//! All merge operations return a new map; nothing here mutates a map that a
//! caller might share between sessions.

use alloc::collections::BTreeMap;
use alloc::string::String;

use hashbrown::HashSet;

use crate::attribute::TokenSet;

/// Reserved key for free-form descriptions that match no known attribute.
pub const FREE_FORM_KEY: &str = "new_attribute";

/// Note label used when free-form content arrives without its own label.
pub const UNLABELLED_NOTE: &str = "other";

/// Attribute name → desired tokens, plus the free-form notes bucket.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        from = "BTreeMap<String, ConstraintEntry>",
        into = "BTreeMap<String, ConstraintEntry>"
    )
)]
pub struct ConstraintMap {
    answers: BTreeMap<String, TokenSet>,
    notes: BTreeMap<String, TokenSet>,
}

impl ConstraintMap {
    /// Empty map: nothing asked, nothing known.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the desired values for `attribute`, replacing any earlier answer.
    ///
    /// Values under [`FREE_FORM_KEY`] go to the notes bucket instead.
    pub fn insert(&mut self, attribute: impl Into<String>, values: impl Into<TokenSet>) {
        let attribute = attribute.into();
        if attribute == FREE_FORM_KEY {
            self.note(UNLABELLED_NOTE, values);
        } else {
            self.answers.insert(attribute, values.into());
        }
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, attribute: impl Into<String>, values: impl Into<TokenSet>) -> Self {
        self.insert(attribute, values);
        self
    }

    /// Add free-form content under `label`, unioned with what is already there.
    pub fn note(&mut self, label: impl Into<String>, values: impl Into<TokenSet>) {
        let values = values.into();
        let entry = self.notes.entry(label.into()).or_default();
        *entry = entry.union(&values);
    }

    /// Record that `attribute` was asked, keeping any tokens already known.
    pub fn mark_asked(&mut self, attribute: impl Into<String>) {
        let attribute = attribute.into();
        if attribute != FREE_FORM_KEY {
            self.answers.entry(attribute).or_default();
        }
    }

    /// Desired tokens for `attribute`, if it was asked.
    pub fn get(&self, attribute: &str) -> Option<&TokenSet> {
        self.answers.get(attribute)
    }

    /// `true` when `attribute` has at least one desired token.
    pub fn is_constrained(&self, attribute: &str) -> bool {
        self.get(attribute).is_some_and(|tokens| !tokens.is_empty())
    }

    /// Attributes already asked about, including those answered with nothing.
    pub fn used_attributes(&self) -> HashSet<&str> {
        self.answers.keys().map(String::as_str).collect()
    }

    /// Answers in attribute-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenSet)> {
        self.answers.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Free-form notes by label.
    pub fn notes(&self) -> &BTreeMap<String, TokenSet> {
        &self.notes
    }

    /// Number of attributes asked about.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    /// `true` when there are neither answers nor notes.
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.notes.is_empty()
    }

    /// Union `other` into a copy of `self`, attribute by attribute and note by note.
    pub fn merged(&self, other: &ConstraintMap) -> ConstraintMap {
        let mut merged = self.clone();
        for (attribute, tokens) in &other.answers {
            let entry = merged.answers.entry(attribute.clone()).or_default();
            *entry = entry.union(tokens);
        }
        for (label, tokens) in &other.notes {
            merged.note(label.clone(), tokens.clone());
        }
        merged
    }

    /// Fold one turn of extracted answers into the accumulated map.
    ///
    /// When the turn added nothing new while a question was pending, the
    /// pending attribute is recorded as asked with an empty answer so the
    /// next call moves on to a different question.
    pub fn fold_answer(&self, extracted: &ConstraintMap, prompted: Option<&str>) -> ConstraintMap {
        let mut merged = self.merged(extracted);
        if merged == *self {
            if let Some(attribute) = prompted {
                merged.mark_asked(attribute);
            }
        }
        merged
    }
}

/// Wire shape of one constraint-map entry: tokens, or the nested notes object.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize, Clone)]
#[serde(untagged)]
enum ConstraintEntry {
    Notes(BTreeMap<String, TokenSet>),
    Tokens(TokenSet),
}

#[cfg(feature = "serde")]
impl From<BTreeMap<String, ConstraintEntry>> for ConstraintMap {
    fn from(raw: BTreeMap<String, ConstraintEntry>) -> Self {
        let mut map = ConstraintMap::new();
        for (key, entry) in raw {
            match entry {
                ConstraintEntry::Notes(notes) => {
                    for (label, tokens) in notes {
                        map.note(label, tokens);
                    }
                }
                ConstraintEntry::Tokens(tokens) => map.insert(key, tokens),
            }
        }
        map
    }
}

#[cfg(feature = "serde")]
impl From<ConstraintMap> for BTreeMap<String, ConstraintEntry> {
    fn from(map: ConstraintMap) -> Self {
        let mut raw: BTreeMap<String, ConstraintEntry> = map
            .answers
            .into_iter()
            .map(|(k, v)| (k, ConstraintEntry::Tokens(v)))
            .collect();
        if !map.notes.is_empty() {
            raw.insert(FREE_FORM_KEY.into(), ConstraintEntry::Notes(map.notes));
        }
        raw
    }
}
