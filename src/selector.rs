//! Greedy next-question selection.
//!
//! For every attribute not yet asked, the selector simulates each answer the
//! remaining candidates could give and measures how many candidates would
//! survive. The attribute with the lowest
//!
//! ```text
//! score = avg_remaining + max_group_size
//! ```
//!
//! wins. The average rewards attributes that split the candidates into many
//! small groups; the maximum punishes attributes with one dominant value that
//! would leave a large group standing. Lower is better.
//!
//! This is a one-step greedy heuristic, not an entropy split. Question order
//! depends on the exact formula.
//!
//! # Invariants
//! - **Gate**: an attribute is scored only if some value leaves a non-empty strict
//!   subset of the candidates. Attributes where every value keeps all or none
//!   are never asked.
//! - **No repeats**: attributes in `used` are never returned.
//! - **Tie-break**: on equal scores the attribute listed first wins (strict `<`).

use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::trace;

use crate::attribute::{AttributeSpec, AttributeValue};
use crate::catalog::{Catalog, Entity};
use crate::filter::count_by_value;

/// Simulation result for one attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeScore {
    /// Distinct tokens the candidates hold for the attribute.
    pub value_count: usize,
    /// Mean number of candidates left over all possible answers.
    pub avg_remaining: f64,
    /// Largest number of candidates left by any single answer.
    pub max_group_size: usize,
    /// `avg_remaining + max_group_size`. Lower is better.
    pub score: f64,
}

/// Picks the attribute whose answer narrows the candidate set fastest.
#[derive(Clone, Copy, Debug)]
pub struct QuestionSelector<'a> {
    catalog: &'a Catalog,
    attributes: &'a AttributeSpec,
}

fn passes_gate(sizes: &[usize], candidate_count: usize) -> bool {
    sizes
        .iter()
        .any(|&remaining| remaining > 0 && remaining < candidate_count)
}

impl<'a> QuestionSelector<'a> {
    /// Selector over `attributes`, reading values through `catalog`'s column layout.
    pub fn new(catalog: &'a Catalog, attributes: &'a AttributeSpec) -> Self {
        Self { catalog, attributes }
    }

    /// Distinct tokens held by `candidates` for `attribute`. Nulls contribute nothing.
    pub fn possible_values<'e>(&self, candidates: &[&'e Entity], attribute: &str) -> HashSet<&'e str> {
        let Some(column) = self.catalog.column(attribute) else {
            return HashSet::new();
        };
        candidates
            .iter()
            .copied()
            .filter_map(|entity| entity.value(column))
            .flat_map(AttributeValue::tokens)
            .collect()
    }

    /// `true` when some answer for `attribute` leaves a non-empty strict subset of `candidates`.
    pub fn can_split(&self, candidates: &[&Entity], attribute: &str) -> bool {
        passes_gate(&self.group_sizes(candidates, attribute), candidates.len())
    }

    /// Simulate every answer for `attribute`. `None` when the attribute fails the gate.
    pub fn score(&self, candidates: &[&Entity], attribute: &str) -> Option<AttributeScore> {
        let sizes = self.group_sizes(candidates, attribute);
        if !passes_gate(&sizes, candidates.len()) {
            return None;
        }

        let total_remaining: usize = sizes.iter().sum();
        let max_group_size = sizes.iter().copied().max().unwrap_or(0);
        let avg_remaining = total_remaining as f64 / sizes.len() as f64;
        Some(AttributeScore {
            value_count: sizes.len(),
            avg_remaining,
            max_group_size,
            score: avg_remaining + max_group_size as f64,
        })
    }

    /// Candidates left after each possible answer, one entry per distinct token.
    fn group_sizes(&self, candidates: &[&Entity], attribute: &str) -> Vec<usize> {
        let column = self.catalog.column(attribute);
        self.possible_values(candidates, attribute)
            .into_iter()
            .map(|token| count_by_value(candidates, column, token))
            .collect()
    }

    /// The best attribute to ask next, or `None` when nothing can narrow `candidates`.
    pub fn select(&self, candidates: &[&Entity], used: &HashSet<&str>) -> Option<&'a str> {
        let attributes: &'a AttributeSpec = self.attributes;
        let mut best: Option<&'a str> = None;
        let mut best_score = f64::INFINITY;

        for attribute in attributes.iter().filter(|a| !used.contains(a)) {
            let Some(scored) = self.score(candidates, attribute) else {
                continue;
            };
            trace!(
                attribute,
                avg_remaining = scored.avg_remaining,
                max_group_size = scored.max_group_size,
                score = scored.score,
                "scored attribute"
            );
            if scored.score < best_score {
                best_score = scored.score;
                best = Some(attribute);
            }
        }

        best.or_else(|| {
            attributes
                .iter()
                .filter(|a| !used.contains(a))
                .find(|a| self.can_split(candidates, a))
        })
    }
}
