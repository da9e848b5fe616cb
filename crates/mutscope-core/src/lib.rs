//! # mutscope-core
//!
//! Sequence model and the deterministic structure-estimation pipeline:
//! validation and diffing, catalogue matching, secondary structure, chain
//! building, hydrophobic collapse, confidence scoring and comparison.
//!
//! Nothing in this crate touches the filesystem or the network.
pub mod catalogue;
pub mod compare;
pub mod confidence;
pub mod error;
pub mod geometry;
pub mod info;
pub mod prediction;
pub mod refine;
pub mod secondary;
pub mod sequence;

pub use catalogue::{Catalogue, MatchResult, ReferenceProtein};
pub use compare::{compare, ComparisonResult, ImpactMagnitude, PredictedEffect};
pub use confidence::ConfidenceBand;
pub use error::ValidationError;
pub use geometry::{build_trace, BackboneTrace};
pub use prediction::{PredictionRecord, Provenance, ReferenceSummary};
pub use refine::{refine, RefinementParams};
pub use secondary::{predict_secondary_structure, SecondaryStructure};
pub use sequence::{validate_and_diff, Mutation, MutationSet, Sequence, ValidatedPair};
