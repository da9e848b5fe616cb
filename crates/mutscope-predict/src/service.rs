//! Per-sequence structure prediction.
//!
//! Each prediction runs a catalogue lookup first:
//!
//! - exact hit: download the reference structure and report it at 95.0
//! - similar hit: download the reference as a template, then synthesize in the
//!   known-mutation band
//! - no hit: synthesize in the novel band
//!
//! A failed download never fails the prediction. It degrades to synthesis and
//! the record is tagged `Synthesized`, so no record claims a match without a
//! downloaded file.

use crate::config::EngineConfig;
use crate::error::{PredictionError, Result};
use chrono::Utc;
use log::{debug, info, warn};
use mutscope_core::catalogue::{Catalogue, MatchResult, ReferenceProtein};
use mutscope_core::confidence::{self, ConfidenceBand};
use mutscope_core::prediction::{PredictionRecord, Provenance, ReferenceSummary};
use mutscope_core::{build_trace, predict_secondary_structure, refine, RefinementParams, Sequence};
use mutscope_io::structure::{write_structure, write_text, StructureError};
use mutscope_io::{load_catalogue, FetchedStructure, StructureSource};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A downloaded structure written to the models directory.
struct Download {
    path: PathBuf,
    model_url: String,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sanitize(job_name: &str) -> String {
    let cleaned: String = job_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "job".to_string()
    } else {
        cleaned
    }
}

pub struct StructurePredictionService {
    catalogue: Arc<Catalogue>,
    source: Arc<dyn StructureSource>,
    models_directory: PathBuf,
    similarity_threshold: f64,
    refinement: RefinementParams,
    counter: AtomicU64,
}

impl StructurePredictionService {
    pub fn new(
        catalogue: Arc<Catalogue>,
        source: Arc<dyn StructureSource>,
        models_directory: impl Into<PathBuf>,
    ) -> Self {
        StructurePredictionService {
            catalogue,
            source,
            models_directory: models_directory.into(),
            similarity_threshold: mutscope_core::catalogue::DEFAULT_MIN_SIMILARITY,
            refinement: RefinementParams::default(),
            counter: AtomicU64::new(0),
        }
    }

    /// Load the catalogue and build the structure source described by `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        let catalogue = Arc::new(load_catalogue(config.catalogue_path.as_deref()));
        StructurePredictionService::new(catalogue, config.structure_source(), &config.models_directory)
            .with_similarity_threshold(config.similarity_threshold)
            .with_refinement(config.refinement)
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementParams) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn models_directory(&self) -> &Path {
        &self.models_directory
    }

    /// `{job}_{nanos}_{n}.{ext}` inside the models directory.
    fn salted_path(&self, job_name: &str, extension: &str) -> PathBuf {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.models_directory
            .join(format!("{}_{}_{}.{}", sanitize(job_name), nanos, n, extension))
    }

    fn ensure_models_directory(&self, job_name: &str) -> Result<()> {
        std::fs::create_dir_all(&self.models_directory).map_err(|source| {
            PredictionError::Serialization {
                job: job_name.to_string(),
                source: StructureError::Write {
                    path: self.models_directory.clone(),
                    source,
                },
            }
        })
    }

    /// Download and store the structure of `protein`. `None` on any failure.
    fn download(&self, protein: &ReferenceProtein, job_name: &str) -> Option<Download> {
        let fetched: FetchedStructure = match self.source.fetch(&protein.id) {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("structure for {} unavailable, falling back to synthesis: {}", protein.id, e);
                return None;
            }
        };
        let path = self.salted_path(job_name, fetched.format.extension());
        if let Err(e) = write_text(&path, &fetched.contents) {
            warn!("could not store structure for {}: {}", protein.id, e);
            return None;
        }
        debug!("stored {} structure at {}", protein.id, path.display());
        Some(Download {
            path,
            model_url: fetched.model_url,
        })
    }

    /// Predict a structure for one validated sequence.
    pub fn predict_structure(&self, sequence: &Sequence, job_name: &str) -> Result<PredictionRecord> {
        let start = Instant::now();
        self.ensure_models_directory(job_name)?;

        match self.catalogue.lookup(sequence, self.similarity_threshold) {
            MatchResult::Exact(protein) => {
                info!("{job_name}: exact catalogue match {}", protein.id);
                let reference = ReferenceSummary {
                    id: protein.id.clone(),
                    name: protein.name.clone(),
                    similarity: 1.0,
                };
                match self.download(&protein, job_name) {
                    Some(download) => Ok(PredictionRecord {
                        sequence: sequence.clone(),
                        job_name: job_name.to_string(),
                        provenance: Provenance::ExactMatch,
                        band: ConfidenceBand::Reference,
                        confidence: ConfidenceBand::Reference.apply(confidence::MAX_SCORE),
                        structure_path: download.path,
                        per_residue_confidence: vec![ConfidenceBand::Reference.range().0; sequence.len()],
                        secondary_structure: None,
                        reference: Some(reference),
                        model_url: Some(download.model_url),
                        template_path: None,
                        processing_time_secs: start.elapsed().as_secs_f64(),
                        created_at: Utc::now(),
                    }),
                    // catalogue support without a structure file
                    None => self.synthesize(sequence, job_name, ConfidenceBand::KnownMutation, Some(reference), None, start),
                }
            }
            MatchResult::Similar(protein, similarity) => {
                info!(
                    "{job_name}: similar catalogue match {} ({:.2}%)",
                    protein.id,
                    similarity * 100.0
                );
                let reference = ReferenceSummary {
                    id: protein.id.clone(),
                    name: protein.name.clone(),
                    similarity,
                };
                let template = self.download(&protein, job_name);
                self.synthesize(sequence, job_name, ConfidenceBand::KnownMutation, Some(reference), template, start)
            }
            MatchResult::NoMatch => {
                info!("{job_name}: no catalogue match, synthesizing");
                self.synthesize(sequence, job_name, ConfidenceBand::Novel, None, None, start)
            }
        }
    }

    fn synthesize(
        &self,
        sequence: &Sequence,
        job_name: &str,
        band: ConfidenceBand,
        reference: Option<ReferenceSummary>,
        template: Option<Download>,
        start: Instant,
    ) -> Result<PredictionRecord> {
        let residues = sequence.as_str();
        let profile = predict_secondary_structure(residues);
        let mut trace = build_trace(sequence.len(), profile.labels());
        refine(residues, &mut trace, &self.refinement);

        let breakdown = confidence::score_breakdown(residues);
        debug!("{job_name}: confidence breakdown {breakdown:?}");
        let overall = round2(band.apply(breakdown.score));
        let per_residue = confidence::per_residue(profile.labels(), overall, band);

        let path = self.salted_path(job_name, "pdb");
        write_structure(&path, job_name, residues, &trace, &per_residue).map_err(|source| {
            PredictionError::Serialization {
                job: job_name.to_string(),
                source,
            }
        })?;

        let (provenance, model_url, template_path) = match template {
            Some(download) => (Provenance::SimilarMatch, Some(download.model_url), Some(download.path)),
            None => (Provenance::Synthesized, None, None),
        };
        debug_assert_eq!(provenance.requires_download(), model_url.is_some());
        info!("{job_name}: {provenance} structure at {overall:.2} confidence");
        Ok(PredictionRecord {
            sequence: sequence.clone(),
            job_name: job_name.to_string(),
            provenance,
            band,
            confidence: overall,
            structure_path: path,
            per_residue_confidence: per_residue,
            secondary_structure: Some(profile.to_string()),
            reference,
            model_url,
            template_path,
            processing_time_secs: start.elapsed().as_secs_f64(),
            created_at: Utc::now(),
        })
    }

    /// Predict both sequences of a pair concurrently.
    pub fn predict_pair(
        &self,
        original: &Sequence,
        mutated: &Sequence,
        job_name: &str,
    ) -> Result<(PredictionRecord, PredictionRecord)> {
        let original_job = format!("{job_name}_original");
        let mutated_job = format!("{job_name}_mutated");
        std::thread::scope(|s| {
            let handle = s.spawn(|| self.predict_structure(original, &original_job));
            let mutated_record = self.predict_structure(mutated, &mutated_job);
            let original_record = handle
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            Ok((original_record?, mutated_record?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscope_io::remote::FetchError;
    use mutscope_io::{OfflineSource, StructureFormat};
    use mutscope_test_data::TestFile;
    use tempfile::tempdir;

    const HBB: &str = "MVHLTPEEKSAVTALWGKVNVDEVGGEALGRLLVVYPWTQRFFESFGDLSTPDAVMGNPKVKAHGKKVLGAFSDGLAHLDNLKGTFATLSELHCDKLHVDPENFRLLGNVLVCVLAHHFGKEFTPPVQAAYQKVVAGVANALAHKYH";

    /// Serves the fixture structure for every id.
    struct FixtureSource;

    impl StructureSource for FixtureSource {
        fn fetch(&self, reference_id: &str) -> std::result::Result<FetchedStructure, FetchError> {
            let contents = String::from_utf8_lossy(TestFile::structure_01().bytes()).into_owned();
            Ok(FetchedStructure {
                reference_id: reference_id.to_string(),
                model_url: format!("https://example.org/{reference_id}.pdb"),
                format: StructureFormat::Pdb,
                contents,
            })
        }
    }

    struct FailingSource;

    impl StructureSource for FailingSource {
        fn fetch(&self, _reference_id: &str) -> std::result::Result<FetchedStructure, FetchError> {
            Err(FetchError::Status {
                url: "https://example.org".to_string(),
                code: 503,
            })
        }
    }

    fn service(source: Arc<dyn StructureSource>, dir: &Path) -> StructurePredictionService {
        StructurePredictionService::new(Arc::new(Catalogue::embedded()), source, dir)
    }

    fn hbb_e6v() -> Sequence {
        let mut s = HBB.to_string();
        s.replace_range(6..7, "V");
        Sequence::parse(&s).unwrap()
    }

    #[test]
    fn test_exact_match_uses_downloaded_structure() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(FixtureSource), dir.path());
        let record = svc.predict_structure(&Sequence::parse(HBB).unwrap(), "hbb").unwrap();
        assert_eq!(record.provenance, Provenance::ExactMatch);
        assert_eq!(record.confidence, 95.0);
        assert!(record.provenance.requires_download());
        assert!(record.structure_path.exists());
        assert_eq!(record.reference.as_ref().unwrap().id, "P68871");
        assert!(record.model_url.is_some());
        assert!(record.secondary_structure.is_none());
    }

    #[test]
    fn test_exact_match_without_download_is_synthesized() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(FailingSource), dir.path());
        let record = svc.predict_structure(&Sequence::parse(HBB).unwrap(), "hbb").unwrap();
        assert_eq!(record.provenance, Provenance::Synthesized);
        assert!(record.model_url.is_none());
        assert!(!record.provenance.requires_download());
        assert!(ConfidenceBand::KnownMutation.contains(record.confidence));
        assert!(record.structure_path.exists());
    }

    #[test]
    fn test_single_substitution_is_similar_match() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(FixtureSource), dir.path());
        let record = svc.predict_structure(&hbb_e6v(), "e6v").unwrap();
        assert_eq!(record.provenance, Provenance::SimilarMatch);
        assert!((78.0..=85.0).contains(&record.confidence));
        assert_eq!(record.provenance.requires_download(), record.model_url.is_some());
        assert!(record.template_path.as_ref().unwrap().exists());
        assert!(record.structure_path.exists());
        assert_eq!(record.secondary_structure.as_ref().unwrap().len(), 147);
    }

    #[test]
    fn test_similar_match_offline_is_synthesized_in_known_band() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(OfflineSource), dir.path());
        let record = svc.predict_structure(&hbb_e6v(), "e6v").unwrap();
        assert_eq!(record.provenance, Provenance::Synthesized);
        assert!((78.0..=85.0).contains(&record.confidence));
        assert!(record.template_path.is_none());
        assert!(record.reference.unwrap().similarity > 0.95);
    }

    #[test]
    fn test_novel_sequence_is_synthesized() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(FixtureSource), dir.path());
        let seq = Sequence::parse("ARNDCQEGHILKMFPSTWYVARNDCQEGHILKMFPSTWYV").unwrap();
        let record = svc.predict_structure(&seq, "novel").unwrap();
        assert_eq!(record.provenance, Provenance::Synthesized);
        assert!((35.0..=55.0).contains(&record.confidence));
        assert_eq!(record.per_residue_confidence.len(), seq.len());
        assert!(record
            .per_residue_confidence
            .iter()
            .all(|v| ConfidenceBand::Novel.contains(*v)));

        let ca = mutscope_io::read_ca_trace(&record.structure_path).unwrap();
        assert_eq!(ca.len(), seq.len());
    }

    #[test]
    fn test_synthesis_is_reproducible() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(OfflineSource), dir.path());
        let seq = Sequence::parse("MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ").unwrap();
        let a = svc.predict_structure(&seq, "repeat").unwrap();
        let b = svc.predict_structure(&seq, "repeat").unwrap();
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.secondary_structure, b.secondary_structure);
        assert_ne!(a.structure_path, b.structure_path);
    }

    #[test]
    fn test_unwritable_models_directory_is_fatal() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("not_a_directory");
        std::fs::write(&file, "x").unwrap();
        let svc = service(Arc::new(OfflineSource), &file);
        let err = svc
            .predict_structure(&Sequence::parse("ARNDCQ").unwrap(), "x")
            .unwrap_err();
        assert!(matches!(err, PredictionError::Serialization { .. }));
    }

    #[test]
    fn test_predict_pair_uses_distinct_files() {
        let dir = tempdir().unwrap();
        let svc = service(Arc::new(OfflineSource), dir.path());
        let original = Sequence::parse("ARNDCQEGHILKMFPSTWYV").unwrap();
        let mutated = Sequence::parse("GRNDCQEGHILKMFPSTWYV").unwrap();
        let (a, b) = svc.predict_pair(&original, &mutated, "pair").unwrap();
        assert_eq!(a.sequence, original);
        assert_eq!(b.sequence, mutated);
        assert_ne!(a.structure_path, b.structure_path);
        assert!(a.structure_path.exists() && b.structure_path.exists());
    }

    #[test]
    fn test_sanitize_job_name() {
        assert_eq!(sanitize("my job/1"), "my_job_1");
        assert_eq!(sanitize(""), "job");
    }
}
