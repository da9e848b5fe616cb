//! Sequence cleaning, validation and positional diffing.
//!
//! The checks run in a fixed order: character validity, then length, then the
//! diff itself, then the mutation-count policy. Each step assumes the previous
//! invariants hold.

use crate::error::{Result, ValidationError};
use crate::info::constants::{is_amino_acid, AminoAcid};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on substitutions between wild type and mutant.
pub const DEFAULT_MAX_MUTATIONS: usize = 2;

/// A validated amino-acid sequence.
///
/// Every character is one of the 20 standard residues and the sequence is never
/// empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sequence(String);

impl Sequence {
    /// Clean and validate raw user input.
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_labeled(raw, "input")
    }

    pub(crate) fn parse_labeled(raw: &str, label: &str) -> Result<Self> {
        let cleaned = clean(raw)?;
        let (valid, symbols) = validate(&cleaned);
        if !valid {
            return Err(ValidationError::InvalidSymbols {
                label: label.to_string(),
                symbols,
            });
        }
        Ok(Sequence(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sequence {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self> {
        Sequence::parse(&value)
    }
}

impl From<Sequence> for String {
    fn from(value: Sequence) -> Self {
        value.0
    }
}

/// Strip whitespace and newlines, upper-case.
pub fn clean(raw: &str) -> Result<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if cleaned.is_empty() {
        return Err(ValidationError::EmptySequence);
    }
    Ok(cleaned)
}

/// Returns `(is_valid, invalid_chars)`, invalid characters deduplicated in order
/// of first appearance.
pub fn validate(seq: &str) -> (bool, Vec<char>) {
    let invalid: Vec<char> = seq.chars().filter(|&c| !is_amino_acid(c)).unique().collect();
    (invalid.is_empty(), invalid)
}

/// A single positional substitution. Positions are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mutation {
    pub position: usize,
    pub original: char,
    pub mutated: char,
}

impl Mutation {
    pub fn new(position: usize, original: char, mutated: char) -> Self {
        Mutation {
            position,
            original,
            mutated,
        }
    }

    /// Standard notation, e.g. `A12G`.
    pub fn notation(&self) -> String {
        format!("{}{}{}", self.original, self.position, self.mutated)
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.original, self.position, self.mutated)
    }
}

/// Ordered list of substitutions with strictly increasing positions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationSet {
    mutations: Vec<Mutation>,
}

impl MutationSet {
    pub fn len(&self) -> usize {
        self.mutations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mutations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mutation> {
        self.mutations.iter()
    }

    pub fn as_slice(&self) -> &[Mutation] {
        &self.mutations
    }

    pub fn positions(&self) -> Vec<usize> {
        self.mutations.iter().map(|m| m.position).collect()
    }

    /// Comma separated notation, e.g. `"A12G, T45C"`.
    pub fn description(&self) -> String {
        self.mutations.iter().map(Mutation::notation).join(", ")
    }

    pub fn summary(&self) -> MutationSummary {
        let mutations = self
            .mutations
            .iter()
            .map(|m| MutationDetail {
                position: m.position,
                original_amino_acid: m.original,
                mutated_amino_acid: m.mutated,
                original_name: residue_name(m.original),
                mutated_name: residue_name(m.mutated),
                notation: m.notation(),
            })
            .collect();
        MutationSummary {
            total_mutations: self.len(),
            positions: self.positions(),
            description: self.description(),
            mutations,
        }
    }
}

impl<'a> IntoIterator for &'a MutationSet {
    type Item = &'a Mutation;
    type IntoIter = std::slice::Iter<'a, Mutation>;

    fn into_iter(self) -> Self::IntoIter {
        self.mutations.iter()
    }
}

fn residue_name(code: char) -> String {
    AminoAcid::from_code1(code).map_or_else(|| code.to_string(), |aa| aa.full_name().to_string())
}

/// Human-readable breakdown of a [`MutationSet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationSummary {
    pub total_mutations: usize,
    pub positions: Vec<usize>,
    pub description: String,
    pub mutations: Vec<MutationDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationDetail {
    pub position: usize,
    pub original_amino_acid: char,
    pub mutated_amino_acid: char,
    pub original_name: String,
    pub mutated_name: String,
    pub notation: String,
}

/// Walk both sequences position by position and collect the mismatches.
pub fn diff(a: &Sequence, b: &Sequence) -> Result<MutationSet> {
    if a.len() != b.len() {
        return Err(ValidationError::LengthMismatch {
            original: a.len(),
            mutated: b.len(),
        });
    }
    let mutations = a
        .as_str()
        .chars()
        .zip(b.as_str().chars())
        .enumerate()
        .filter(|(_, (orig, mutated))| orig != mutated)
        .map(|(idx, (orig, mutated))| Mutation::new(idx + 1, orig, mutated))
        .collect();
    Ok(MutationSet { mutations })
}

pub fn enforce_policy(mutations: &MutationSet, max: usize) -> Result<()> {
    if mutations.len() > max {
        return Err(ValidationError::TooManyMutations {
            found: mutations.len(),
            max,
        });
    }
    if mutations.is_empty() {
        return Err(ValidationError::NoDifference);
    }
    Ok(())
}

/// The validated pair together with its substitutions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPair {
    pub original: Sequence,
    pub mutated: Sequence,
    pub mutations: MutationSet,
}

/// Clean, validate, diff and apply the mutation-count policy.
pub fn validate_and_diff(original: &str, mutated: &str, max_mutations: usize) -> Result<ValidatedPair> {
    let original = Sequence::parse_labeled(original, "original")?;
    let mutated = Sequence::parse_labeled(mutated, "mutated")?;
    let mutations = diff(&original, &mutated)?;
    enforce_policy(&mutations, max_mutations)?;
    Ok(ValidatedPair {
        original,
        mutated,
        mutations,
    })
}
