//! One turn of an identification conversation.
//!
//! [`identify`] is stateless: the caller passes everything gathered so far
//! and gets back exactly one of a next question or a ranked match list.
//!
//! ```text
//! constraints ──► filter_candidates ──► QuestionSelector ──► Asking   (question)
//!                        │                     │
//!                        └── few left ─────────┴── none ──► Terminal (matches)
//!                                                             ▲
//!                                        MatchRanker over the full catalog
//! ```
//!
//! Ranking always runs over the full catalog rather than the filtered
//! candidates, so one wrong answer early on lowers the true entity's score
//! instead of removing it.
//!
//! # Quiz mode
//!
//! When the caller knows which entity the user is describing (a guessing
//! game), it passes that entity's id as `target`. If the target has been
//! filtered out, the result carries the attributes where the user's answers
//! disagree with it. This is informational and never changes the question
//! or the matches.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::catalog::{Catalog, Entity, EntityId};
use crate::config::IdentifyConfig;
use crate::constraint::ConstraintMap;
use crate::filter::{admits, filter_candidates};
use crate::ranker::{MatchRanker, MatchResult};
use crate::selector::QuestionSelector;

/// Where a conversation stands after a call to [`identify`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// Another question is worth asking.
    Asking,
    /// Final ranked matches are available.
    Terminal,
}

/// A constrained attribute on which the quiz target disagrees with the user.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discrepancy {
    /// Attribute name.
    pub attribute: String,
    /// Tokens the user asked for.
    pub requested: Vec<String>,
    /// The target's stored value.
    pub actual: String,
}

/// Outcome of one call to [`identify`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identification {
    /// Next attribute to ask about. Always `None` in the terminal state.
    pub question: Option<String>,
    /// Quiz-mode disagreements, when a target was given and has been filtered out.
    pub discrepancies: Option<Vec<Discrepancy>>,
    /// Ranked matches. Present exactly in the terminal state.
    pub matches: Option<Vec<MatchResult>>,
    /// Size of the filtered candidate set.
    pub candidate_count: usize,
}

impl Identification {
    /// `Terminal` when matches were produced, `Asking` otherwise.
    pub fn state(&self) -> SessionState {
        if self.matches.is_some() {
            SessionState::Terminal
        } else {
            SessionState::Asking
        }
    }
}

/// Everything a caller needs to persist to replay a turn.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentifyRequest {
    /// Answers gathered so far.
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraints: ConstraintMap,
    /// Quiz-mode target, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<EntityId>,
}

impl IdentifyRequest {
    /// Run [`identify`] for this request.
    pub fn run(&self, catalog: &Catalog, config: &IdentifyConfig) -> Identification {
        identify(catalog, &self.constraints, config, self.target)
    }
}

/// Decide the next step of a conversation.
///
/// - Filters the catalog by `constraints`.
/// - Checks the quiz `target`, if any, against the filtered set.
/// - Asks the selector for the next question.
/// - Ranks the full catalog when fewer than `config.candidate_threshold`
///   candidates remain or no attribute can narrow them further.
pub fn identify(
    catalog: &Catalog,
    constraints: &ConstraintMap,
    config: &IdentifyConfig,
    target: Option<EntityId>,
) -> Identification {
    let candidates = filter_candidates(catalog, constraints);
    let discrepancies = target.and_then(|id| check_target(catalog, &candidates, constraints, id));

    let used = constraints.used_attributes();
    let question = QuestionSelector::new(catalog, &config.attributes).select(&candidates, &used);

    if candidates.len() < config.candidate_threshold || question.is_none() {
        let matches = MatchRanker::new(&config.attributes).rank(catalog, constraints, config.match_limit);
        debug!(
            candidates = candidates.len(),
            matches = matches.len(),
            "identification terminal"
        );
        return Identification {
            question: None,
            discrepancies,
            matches: Some(matches),
            candidate_count: candidates.len(),
        };
    }

    debug!(candidates = candidates.len(), question, "asking next question");
    Identification {
        question: question.map(ToString::to_string),
        discrepancies,
        matches: None,
        candidate_count: candidates.len(),
    }
}

fn check_target(
    catalog: &Catalog,
    candidates: &[&Entity],
    constraints: &ConstraintMap,
    id: EntityId,
) -> Option<Vec<Discrepancy>> {
    let Some(target) = catalog.get(id) else {
        warn!(entity = id.0, "quiz target not in catalog, skipping check");
        return None;
    };
    if candidates.iter().any(|entity| entity.id() == id) {
        return None;
    }
    Some(find_discrepancies(catalog, target, constraints))
}

/// Constrained attributes whose answers rule `target` out, in attribute-name order.
///
/// Null target values never disagree, and neither do empty answers.
pub fn find_discrepancies(
    catalog: &Catalog,
    target: &Entity,
    constraints: &ConstraintMap,
) -> Vec<Discrepancy> {
    constraints
        .iter()
        .filter_map(|(attribute, tokens)| {
            let column = catalog.column(attribute);
            if admits(target, column, tokens) {
                return None;
            }
            let actual = column.and_then(|c| target.value(c))?;
            Some(Discrepancy {
                attribute: attribute.to_string(),
                requested: tokens.to_vec(),
                actual: actual.as_str().to_string(),
            })
        })
        .collect()
}
