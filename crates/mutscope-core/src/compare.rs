//! Structural comparison of two prediction records.
//!
//! The displacement is a proxy derived from the confidence gap. The traces are
//! never superposed, so two very different folds with equal confidence compare
//! as nearly identical.

use crate::prediction::PredictionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

pub const MIN_DISPLACEMENT: f64 = 0.5;
pub const MAX_DISPLACEMENT: f64 = 5.0;
pub const COMPARISON_METHOD: &str = "confidence_proxy";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ImpactMagnitude {
    Stable,
    Moderate,
    Significant,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PredictedEffect {
    Beneficial,
    Neutral,
    Detrimental,
}

impl ImpactMagnitude {
    pub fn classify(delta: f64) -> Self {
        match delta.abs() {
            d if d < 5.0 => Self::Stable,
            d if d < 15.0 => Self::Moderate,
            _ => Self::Significant,
        }
    }
}

impl PredictedEffect {
    pub fn classify(delta: f64) -> Self {
        if delta > 0.0 {
            Self::Beneficial
        } else if delta < 0.0 {
            Self::Detrimental
        } else {
            Self::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Estimated displacement in Å, within `[0.5, 5.0]`.
    pub displacement: f64,
    /// `mutated - original`, rounded to 2 decimals.
    pub confidence_delta: f64,
    pub original_confidence: f64,
    pub mutated_confidence: f64,
    pub magnitude: ImpactMagnitude,
    pub effect: PredictedEffect,
    pub method: String,
    pub compared_at: DateTime<Utc>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Displacement proxy for two confidence values.
pub fn displacement(confidence_a: f64, confidence_b: f64) -> f64 {
    let raw = MIN_DISPLACEMENT + (confidence_a - confidence_b).abs() / 100.0 * 4.5;
    round_to(raw.clamp(MIN_DISPLACEMENT, MAX_DISPLACEMENT), 3)
}

/// Compare `original` against `mutated`. Classification uses the raw delta;
/// only the reported delta is rounded.
pub fn compare(original: &PredictionRecord, mutated: &PredictionRecord) -> ComparisonResult {
    let delta = mutated.confidence - original.confidence;
    ComparisonResult {
        displacement: displacement(original.confidence, mutated.confidence),
        confidence_delta: round_to(delta, 2),
        original_confidence: original.confidence,
        mutated_confidence: mutated.confidence,
        magnitude: ImpactMagnitude::classify(delta),
        effect: PredictedEffect::classify(delta),
        method: COMPARISON_METHOD.to_string(),
        compared_at: Utc::now(),
    }
}
