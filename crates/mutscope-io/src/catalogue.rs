//! Catalogue sources.
//!
//! A catalogue source is a versioned JSON document:
//!
//! ```json
//! { "version": "2025.1",
//!   "proteins": [ { "id": "P68871", "name": "...", "organism": "...",
//!                   "function": "...", "sequence": "MVHL...", "length": 147,
//!                   "confidence_score": 95 } ] }
//! ```
use log::{info, warn};
use mutscope_core::catalogue::{Catalogue, ReferenceProtein};
use mutscope_core::sequence::Sequence;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("could not read catalogue {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse catalogue {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("catalogue {path} has no usable entries")]
    Empty { path: PathBuf },
}

#[derive(Debug, Deserialize)]
struct CatalogueSource {
    #[serde(default)]
    version: Option<String>,
    proteins: Vec<CatalogueEntry>,
}

#[derive(Debug, Deserialize)]
struct CatalogueEntry {
    id: String,
    name: String,
    #[serde(default = "unknown_organism")]
    organism: String,
    #[serde(default)]
    function: Option<String>,
    sequence: String,
    #[serde(default)]
    length: Option<usize>,
    #[serde(default)]
    confidence_score: Option<f64>,
}

fn unknown_organism() -> String {
    "Unknown".to_string()
}

impl CatalogueEntry {
    fn into_protein(self) -> Option<ReferenceProtein> {
        let sequence = match Sequence::parse(&self.sequence) {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!("skipping catalogue entry {}: {}", self.id, e);
                return None;
            }
        };
        if let Some(length) = self.length {
            if length != sequence.len() {
                warn!(
                    "skipping catalogue entry {}: declared length {} but sequence has {}",
                    self.id,
                    length,
                    sequence.len()
                );
                return None;
            }
        }
        let mut protein = ReferenceProtein::new(&self.id, &self.name, &self.organism, sequence);
        protein.function = self.function;
        protein.confidence_baseline = self.confidence_score;
        Some(protein)
    }
}

/// Parse a catalogue source. Invalid entries are skipped; a source with no
/// usable entries is an error.
pub fn read_catalogue(path: &Path) -> Result<Catalogue, CatalogueError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source: CatalogueSource =
        serde_json::from_str(&text).map_err(|source| CatalogueError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut proteins = Vec::with_capacity(source.proteins.len());
    for protein in source.proteins.into_iter().filter_map(CatalogueEntry::into_protein) {
        if !seen.insert(protein.sequence.clone()) {
            warn!("skipping catalogue entry {}: duplicate sequence", protein.id);
            continue;
        }
        proteins.push(protein);
    }
    if proteins.is_empty() {
        return Err(CatalogueError::Empty {
            path: path.to_path_buf(),
        });
    }
    info!(
        "loaded {} proteins from {} (version {})",
        proteins.len(),
        path.display(),
        source.version.as_deref().unwrap_or("unversioned")
    );
    Ok(Catalogue::new(proteins))
}

/// Load a catalogue, falling back to the embedded set when `path` is absent
/// or unusable. Never fails.
pub fn load_catalogue(path: Option<&Path>) -> Catalogue {
    let Some(path) = path else {
        info!("no catalogue source configured, using embedded catalogue");
        return Catalogue::embedded();
    };
    match read_catalogue(path) {
        Ok(catalogue) => catalogue,
        Err(e) => {
            warn!("{e}; using embedded catalogue");
            Catalogue::embedded()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscope_test_data::TestFile;

    #[test]
    fn test_read_catalogue_skips_bad_entries() {
        let (path, _temp) = TestFile::catalogue_01().create_temp().unwrap();
        let catalogue = read_catalogue(Path::new(&path)).unwrap();
        let ids: Vec<&str> = catalogue.list().iter().map(|(id, _, _)| *id).collect();
        assert_eq!(ids, vec!["P68871", "P01308", "P61626"]);
        assert_eq!(catalogue.get("P01308").unwrap().len(), 110);
        assert_eq!(catalogue.get("P61626").unwrap().len(), 148);
        assert_eq!(catalogue.get("P68871").unwrap().confidence_baseline, Some(95.0));
        assert_eq!(catalogue.get("P61626").unwrap().confidence_baseline, None);
    }

    #[test]
    fn test_corrupt_source_falls_back() {
        let (path, _temp) = TestFile::catalogue_corrupt().create_temp().unwrap();
        assert!(matches!(
            read_catalogue(Path::new(&path)),
            Err(CatalogueError::Parse { .. })
        ));
        assert_eq!(load_catalogue(Some(Path::new(&path))), Catalogue::embedded());
    }

    #[test]
    fn test_missing_source_falls_back() {
        let missing = Path::new("/nonexistent/catalogue.json");
        assert!(matches!(read_catalogue(missing), Err(CatalogueError::Io { .. })));
        assert_eq!(load_catalogue(Some(missing)).len(), 3);
        assert_eq!(load_catalogue(None), Catalogue::embedded());
    }

    #[test]
    fn test_empty_source_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, r#"{"version": "1", "proteins": []}"#).unwrap();
        assert!(matches!(read_catalogue(&path), Err(CatalogueError::Empty { .. })));
        assert_eq!(load_catalogue(Some(&path)), Catalogue::embedded());
    }
}
