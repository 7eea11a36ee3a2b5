//! # ident-core
//!
//! The decision core of a twenty-questions identification feature.
//!
//! A user describes something (a bird they saw, say) in loose, partial,
//! possibly wrong terms. The core answers two questions on every turn:
//!
//! - **What should we ask next?** The attribute whose answer narrows the
//!   remaining candidates fastest.
//! - **Or is it time to show results?** A ranked list of the whole catalog,
//!   scored with partial credit so that missing data and one bad answer do
//!   not sink the right entity.
//!
//! Language understanding, summaries, persistence, and HTTP live elsewhere.
//! They hand this crate a structured [`ConstraintMap`] and a [`Catalog`]
//! snapshot and get back a question name, a match list, and (in quiz mode)
//! a list of discrepancies.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! ConstraintMap ─► filter_candidates ─► QuestionSelector ─► question
//!       │                                      │ none / few left
//!       └──────────────► MatchRanker ◄─────────┘
//!                    (full catalog)   ─► matches
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`attribute`] | [`AttributeSpec`], [`AttributeValue`], [`TokenSet`] | Attribute names, multi-value strings, token normalisation |
//! | [`catalog`] | [`Catalog`], [`Entity`], [`EntityRecord`] | Validated read-only entity snapshot |
//! | [`constraint`] | [`ConstraintMap`] | Answers so far, non-mutating merge, free-form notes |
//! | [`filter`] | [`filter_candidates`] | Null-tolerant contains predicate |
//! | [`selector`] | [`QuestionSelector`] | Greedy `avg + max` next-question choice |
//! | [`ranker`] | [`MatchRanker`], [`MatchResult`] | Partial-credit match percentages |
//! | [`session`] | [`identify`], [`Identification`] | One stateless conversation turn |
//! | [`config`] | [`IdentifyConfig`] | Thresholds and askable attributes |
//! | [`birds`] | [`birds::BIRD_ATTRIBUTES`] | Reference attribute list for bird identification |
//! | [`record`] | [`record::CatalogDocument`] | Serialisable catalog documents (requires `serde` feature) |
//!
//! ## Example
//!
//! ```rust
//! use ident_core::{identify, AttributeSpec, Catalog, ConstraintMap, EntityRecord, IdentifyConfig};
//!
//! let columns = AttributeSpec::new(["color", "size"]).unwrap();
//! let catalog = Catalog::new(columns.clone(), [
//!     EntityRecord::new(1, "Cardinal").with_value("color", "red").with_value("size", "small"),
//!     EntityRecord::new(2, "Tanager").with_value("color", "red").with_value("size", "medium"),
//!     EntityRecord::new(3, "Jay").with_value("color", "blue").with_value("size", "medium"),
//! ]).unwrap();
//! let config = IdentifyConfig::with_attributes(columns);
//!
//! let turn = identify(&catalog, &ConstraintMap::new(), &config, None);
//! assert_eq!(turn.question.as_deref(), Some("color"));
//!
//! let answers = ConstraintMap::new().with("color", "red").with("size", "small");
//! let done = identify(&catalog, &answers, &config, None);
//! assert_eq!(done.matches.unwrap()[0].name, "Cardinal");
//! ```
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs only `alloc`. Enable the
//! `std` feature to link std. Enable `serde` for serialisation of every public
//! record and the [`record`] module. Enable `python-ffi` for PyO3 bindings.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi", test)), no_std)]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod attribute;
pub mod birds;
pub mod catalog;
pub mod config;
pub mod constraint;
pub mod error;
pub mod filter;
pub mod ranker;
pub mod selector;
pub mod session;
#[cfg(feature = "serde")]
pub mod record;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use attribute::{AttributeSpec, AttributeValue, TokenSet};
pub use catalog::{Catalog, Entity, EntityId, EntityRecord};
pub use config::IdentifyConfig;
pub use constraint::{ConstraintMap, FREE_FORM_KEY};
pub use error::{Error, Result};
pub use filter::filter_candidates;
pub use ranker::{MatchRanker, MatchResult};
pub use selector::QuestionSelector;
pub use session::{identify, Discrepancy, Identification, IdentifyRequest, SessionState};
