//! Prediction records handed from the prediction service to its callers.

use crate::confidence::ConfidenceBand;
use crate::sequence::Sequence;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use strum::Display;

/// How the structure behind a record was obtained.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Provenance {
    /// Downloaded structure of an identical catalogue protein.
    ExactMatch,
    /// Synthesized against a downloaded template of a near-identical protein.
    SimilarMatch,
    Synthesized,
}

impl Provenance {
    /// Whether the record must be backed by a downloaded structure file.
    pub const fn requires_download(&self) -> bool {
        matches!(self, Self::ExactMatch | Self::SimilarMatch)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSummary {
    pub id: String,
    pub name: String,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub sequence: Sequence,
    pub job_name: String,
    pub provenance: Provenance,
    pub band: ConfidenceBand,
    /// Overall confidence in `[0, 100]`.
    pub confidence: f64,
    pub structure_path: PathBuf,
    pub per_residue_confidence: Vec<f64>,
    /// `H`/`E`/`C` string, only for synthesized structures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_structure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceSummary>,
    /// Source of a downloaded structure or template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_url: Option<String>,
    /// Downloaded template a similar match was synthesized against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
    pub processing_time_secs: f64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_names() {
        assert_eq!(Provenance::SimilarMatch.to_string(), "similar_match");
        assert_eq!(
            serde_json::to_string(&Provenance::ExactMatch).unwrap(),
            "\"exact_match\""
        );
        assert!(Provenance::ExactMatch.requires_download());
        assert!(!Provenance::Synthesized.requires_download());
    }

    #[test]
    fn test_record_serde() {
        let record = PredictionRecord {
            sequence: Sequence::parse("ARNDCQ").unwrap(),
            job_name: "job".to_string(),
            provenance: Provenance::Synthesized,
            band: ConfidenceBand::Novel,
            confidence: 42.5,
            structure_path: PathBuf::from("models/job.pdb"),
            per_residue_confidence: vec![40.0; 6],
            secondary_structure: Some("CCCCCC".to_string()),
            reference: None,
            model_url: None,
            template_path: None,
            processing_time_secs: 0.01,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("model_url"));
        let back: PredictionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
