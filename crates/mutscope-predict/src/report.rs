//! Comparison reports: the aggregate handed to persistence.

use crate::error::{PredictionError, Result};
use crate::service::StructurePredictionService;
use chrono::{DateTime, Utc};
use log::info;
use mutscope_core::compare::{compare, ComparisonResult};
use mutscope_core::prediction::PredictionRecord;
use mutscope_core::sequence::{validate_and_diff, MutationSummary, Sequence};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use strum::Display;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportStatus {
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub name: String,
    pub original_sequence: Sequence,
    pub mutated_sequence: Sequence,
    pub mutations: MutationSummary,
    pub original: PredictionRecord,
    pub mutated: PredictionRecord,
    pub comparison: ComparisonResult,
    pub processing_time_secs: f64,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

/// Compare two prediction records.
pub fn compare_structures(original: &PredictionRecord, mutated: &PredictionRecord) -> ComparisonResult {
    compare(original, mutated)
}

/// Validate, diff, predict both sequences and compare them.
pub fn run_comparison(
    service: &StructurePredictionService,
    original: &str,
    mutated: &str,
    name: &str,
    max_mutations: usize,
) -> Result<ComparisonReport> {
    let start = Instant::now();
    let pair = validate_and_diff(original, mutated, max_mutations)?;
    info!("{name}: {}", pair.mutations.description());

    let (original_record, mutated_record) =
        service.predict_pair(&pair.original, &pair.mutated, name)?;
    let comparison = compare_structures(&original_record, &mutated_record);
    info!(
        "{name}: {} {} (delta {:+.2})",
        comparison.magnitude, comparison.effect, comparison.confidence_delta
    );

    Ok(ComparisonReport {
        name: name.to_string(),
        original_sequence: pair.original,
        mutated_sequence: pair.mutated,
        mutations: pair.mutations.summary(),
        original: original_record,
        mutated: mutated_record,
        comparison,
        processing_time_secs: start.elapsed().as_secs_f64(),
        status: ReportStatus::Completed,
        created_at: Utc::now(),
    })
}

/// Write `report` as pretty JSON.
pub fn write_report(path: &Path, report: &ComparisonReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).map_err(|source| PredictionError::Report {
        path: path.to_path_buf(),
        source,
    })
}
