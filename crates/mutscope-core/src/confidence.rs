//! Heuristic confidence scoring.
//!
//! Scores are self-consistent heuristics over sequence composition, not
//! calibrated probabilities. A synthesis score always lands in `[40, 95]` and is
//! then mapped into the band that matches how the structure was obtained.

use crate::info::constants::{helix_propensity, sheet_propensity, RARE_SYMBOLS};
use crate::secondary::SecondaryStructure;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;

pub const MIN_SCORE: f64 = 40.0;
pub const MAX_SCORE: f64 = 95.0;

/// Short signatures recurring across the globin family.
const SIGNAL_MOTIFS: [&str; 8] = ["GKV", "HGKK", "VDPE", "LSEL", "GEAL", "WGK", "FPHF", "NVK"];

const STABILIZING: &[char] = &['C', 'W', 'Y', 'F', 'I', 'L', 'V'];
const DESTABILIZING: &[char] = &['G', 'P', 'N', 'S'];
const CHARGED: &[char] = &['D', 'E', 'K', 'R', 'H'];
const IDEAL_CHARGED_RATIO: f64 = 0.25;

#[rustfmt::skip]
mod weights {
    pub const HOMOLOGY:   f64 = 0.35;
    pub const BALANCE:    f64 = 0.30;
    pub const STABILITY:  f64 = 0.20;
    pub const UNIQUENESS: f64 = 0.10;
    pub const PENALTY:    f64 = 0.05;
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// 64-bit FNV-1a.
pub fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Where a confidence value is allowed to land.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum ConfidenceBand {
    /// Exact catalogue match with a downloaded structure.
    Reference,
    /// Near-identical to a catalogued protein.
    KnownMutation,
    /// No catalogue support.
    Novel,
}

impl ConfidenceBand {
    pub const fn range(&self) -> (f64, f64) {
        match self {
            Self::Reference => (95.0, 95.0),
            Self::KnownMutation => (78.0, 85.0),
            Self::Novel => (35.0, 55.0),
        }
    }

    /// Map a synthesis score in `[40, 95]` linearly into the band.
    pub fn apply(&self, raw: f64) -> f64 {
        let (lo, hi) = self.range();
        let t = ((raw - MIN_SCORE) / (MAX_SCORE - MIN_SCORE)).clamp(0.0, 1.0);
        lo + t * (hi - lo)
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.range();
        (lo..=hi).contains(&value)
    }
}

/// The sub-scores behind a synthesis score, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceBreakdown {
    pub homology: f64,
    pub balance: f64,
    pub stability: f64,
    pub uniqueness: f64,
    pub penalty: f64,
    pub score: f64,
}

fn ratio(chars: &[char], set: &[char]) -> f64 {
    chars.iter().filter(|c| set.contains(*c)).count() as f64 / chars.len() as f64
}

fn homology_score(residues: &str, len: usize) -> f64 {
    let found = SIGNAL_MOTIFS.iter().filter(|m| residues.contains(**m)).count();
    let length_bonus = if (50..=300).contains(&len) { 15.0 } else { 5.0 };
    (40.0 + 12.0 * found as f64 + length_bonus).min(100.0)
}

fn balance_score(chars: &[char]) -> f64 {
    let n = chars.len() as f64;
    let helix = chars.iter().map(|&c| helix_propensity(c)).sum::<f64>() / n;
    let sheet = chars.iter().map(|&c| sheet_propensity(c)).sum::<f64>() / n;
    (100.0 - (helix - sheet).abs() * 200.0).clamp(0.0, 100.0)
}

fn stability_score(chars: &[char]) -> f64 {
    let stabilizing = ratio(chars, STABILIZING);
    let destabilizing = ratio(chars, DESTABILIZING);
    let charged = ratio(chars, CHARGED);
    (50.0 + stabilizing * 100.0 - destabilizing * 80.0
        - (charged - IDEAL_CHARGED_RATIO).abs() * 100.0)
        .clamp(0.0, 100.0)
}

fn uniqueness_score(residues: &str) -> f64 {
    (fnv1a(residues.as_bytes()) % 1000) as f64 / 10.0
}

fn penalty_score(chars: &[char]) -> f64 {
    let rare = chars.iter().filter(|c| RARE_SYMBOLS.contains(*c)).count();
    let mut penalty = (rare as f64 * 10.0).min(40.0);
    if chars.len() < 30 || chars.len() > 1000 {
        penalty += 20.0;
    }
    let counts = chars.iter().counts();
    if counts.len() < 10 {
        penalty += 20.0;
    }
    let dominant = counts.values().copied().max().unwrap_or(0);
    if dominant as f64 / chars.len() as f64 > 0.2 {
        penalty += 20.0;
    }
    penalty.min(100.0)
}

/// Score an arbitrary residue string. Never leaves `[40, 95]`.
pub fn score_breakdown(residues: &str) -> ConfidenceBreakdown {
    let chars: Vec<char> = residues.chars().collect();
    if chars.is_empty() {
        return ConfidenceBreakdown {
            homology: 0.0,
            balance: 0.0,
            stability: 0.0,
            uniqueness: 0.0,
            penalty: 0.0,
            score: MIN_SCORE,
        };
    }
    let homology = homology_score(residues, chars.len());
    let balance = balance_score(&chars);
    let stability = stability_score(&chars);
    let uniqueness = uniqueness_score(residues);
    let penalty = penalty_score(&chars);
    let raw = weights::HOMOLOGY * homology
        + weights::BALANCE * balance
        + weights::STABILITY * stability
        + weights::UNIQUENESS * uniqueness
        - weights::PENALTY * penalty;
    let score = MIN_SCORE + (MAX_SCORE - MIN_SCORE) * raw.clamp(0.0, 100.0) / 100.0;
    ConfidenceBreakdown {
        homology,
        balance,
        stability,
        uniqueness,
        penalty,
        score,
    }
}

pub fn score(residues: &str) -> f64 {
    score_breakdown(residues).score
}

/// Per-residue values around `overall`: ordered elements above, coil below,
/// every value clamped to `band`.
pub fn per_residue(labels: &[SecondaryStructure], overall: f64, band: ConfidenceBand) -> Vec<f64> {
    labels
        .iter()
        .map(|label| {
            let offset = match label {
                SecondaryStructure::Helix => 5.0,
                SecondaryStructure::Sheet => 3.0,
                SecondaryStructure::Coil => -8.0,
            };
            band.clamp(overall + offset)
        })
        .collect()
}
