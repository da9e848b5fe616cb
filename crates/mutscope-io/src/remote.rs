//! Remote structure databases.
//!
//! Lookups are keyed by catalogue id and follow the AlphaFold DB API: a
//! prediction listing at `{api_base}/prediction/{id}` that links to the
//! structure file, which is then downloaded as text.

use crate::structure::StructureFormat;
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://alphafold.ebi.ac.uk/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("remote lookups are disabled")]
    Disabled,

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u16 },

    #[error("unusable response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// A structure file downloaded for a catalogue protein.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedStructure {
    pub reference_id: String,
    pub model_url: String,
    pub format: StructureFormat,
    pub contents: String,
}

/// Anything that can produce a known structure for a catalogue id.
///
/// Shared across the two predictions of a pair, hence `Send + Sync`.
pub trait StructureSource: Send + Sync {
    fn fetch(&self, reference_id: &str) -> Result<FetchedStructure, FetchError>;
}

/// Never fetches; every lookup degrades to synthesis.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSource;

impl StructureSource for OfflineSource {
    fn fetch(&self, _reference_id: &str) -> Result<FetchedStructure, FetchError> {
        Err(FetchError::Disabled)
    }
}

#[derive(Debug, Deserialize)]
struct PredictionEntry {
    #[serde(rename = "cifUrl")]
    cif_url: Option<String>,
    #[serde(rename = "pdbUrl")]
    pdb_url: Option<String>,
}

/// Pick the structure link from a prediction listing, mmCIF first.
fn structure_url(listing: &str, url: &str) -> Result<String, FetchError> {
    let entries: Vec<PredictionEntry> =
        serde_json::from_str(listing).map_err(|e| FetchError::Malformed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
    entries
        .into_iter()
        .find_map(|entry| entry.cif_url.or(entry.pdb_url))
        .ok_or_else(|| FetchError::Malformed {
            url: url.to_string(),
            reason: "no structure link in prediction listing".to_string(),
        })
}

/// AlphaFold DB client with a bounded per-request timeout.
pub struct AlphaFoldDbClient {
    agent: ureq::Agent,
    api_base: String,
}

impl AlphaFoldDbClient {
    pub fn new(api_base: &str, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        AlphaFoldDbClient {
            agent,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(code) => FetchError::Status {
                url: url.to_string(),
                code,
            },
            other => FetchError::Transport {
                url: url.to_string(),
                source: Box::new(other),
            },
        })?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: Box::new(e),
            })
    }
}

impl Default for AlphaFoldDbClient {
    fn default() -> Self {
        AlphaFoldDbClient::new(DEFAULT_API_BASE, DEFAULT_TIMEOUT)
    }
}

impl StructureSource for AlphaFoldDbClient {
    fn fetch(&self, reference_id: &str) -> Result<FetchedStructure, FetchError> {
        let listing_url = format!("{}/prediction/{}", self.api_base, reference_id);
        debug!("looking up {reference_id} at {listing_url}");
        let listing = self.get_text(&listing_url)?;
        let model_url = structure_url(&listing, &listing_url)?;

        info!("downloading structure for {reference_id} from {model_url}");
        let contents = self.get_text(&model_url)?;
        let format = StructureFormat::detect(&contents).ok_or_else(|| FetchError::Malformed {
            url: model_url.clone(),
            reason: "payload has no atom records".to_string(),
        })?;
        Ok(FetchedStructure {
            reference_id: reference_id.to_string(),
            model_url,
            format,
            contents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_url_prefers_cif() {
        let listing = r#"[{"entryId": "AF-P68871-F1",
            "pdbUrl": "https://alphafold.ebi.ac.uk/files/AF-P68871-F1-model_v4.pdb",
            "cifUrl": "https://alphafold.ebi.ac.uk/files/AF-P68871-F1-model_v4.cif"}]"#;
        assert_eq!(
            structure_url(listing, "listing").unwrap(),
            "https://alphafold.ebi.ac.uk/files/AF-P68871-F1-model_v4.cif"
        );
        let pdb_only = r#"[{"pdbUrl": "https://example.org/a.pdb"}]"#;
        assert_eq!(structure_url(pdb_only, "listing").unwrap(), "https://example.org/a.pdb");
    }

    #[test]
    fn test_structure_url_malformed() {
        assert!(matches!(
            structure_url("[]", "listing"),
            Err(FetchError::Malformed { .. })
        ));
        assert!(matches!(
            structure_url("<html>", "listing"),
            Err(FetchError::Malformed { .. })
        ));
        assert!(matches!(
            structure_url(r#"[{"entryId": "x"}]"#, "listing"),
            Err(FetchError::Malformed { .. })
        ));
    }

    #[test]
    fn test_offline_source() {
        assert!(matches!(OfflineSource.fetch("P68871"), Err(FetchError::Disabled)));
    }

    #[test]
    fn test_client_trims_base() {
        let client = AlphaFoldDbClient::new("https://example.org/api/", Duration::from_secs(1));
        assert_eq!(client.api_base, "https://example.org/api");
    }
}
