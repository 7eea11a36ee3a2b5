//! Tunables for an identification session.

use crate::attribute::AttributeSpec;
use crate::birds::bird_attribute_spec;

/// Default cutoff below which the session stops asking and shows results.
pub const DEFAULT_CANDIDATE_THRESHOLD: usize = 2;

/// Default number of ranked matches returned in the terminal state.
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// Configuration for [`identify`](crate::session::identify).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct IdentifyConfig {
    /// Attributes the session may ask about, in tie-break order.
    /// Also the attributes that count toward match percentages.
    pub attributes: AttributeSpec,

    /// When fewer candidates than this remain, stop asking and rank.
    /// Default: 2 (ask until one candidate is left).
    pub candidate_threshold: usize,

    /// Maximum number of ranked matches returned.
    /// Default: 5.
    pub match_limit: usize,
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            attributes: bird_attribute_spec(),
            candidate_threshold: DEFAULT_CANDIDATE_THRESHOLD,
            match_limit: DEFAULT_MATCH_LIMIT,
        }
    }
}

impl IdentifyConfig {
    /// Default thresholds over a custom attribute list.
    pub fn with_attributes(attributes: AttributeSpec) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }
}
