//! Known protein catalogue.
//!
//! A read-only set of reference proteins with previously solved structures.
//! Matching is positional identity, not alignment: a single insertion or
//! deletion drives similarity toward 0 even for near-identical sequences.

use crate::sequence::Sequence;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

/// Default threshold for a near-identical match.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.95;

/// Relative length difference above which similarity is defined as 0.
pub const MAX_LENGTH_DIFFERENCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceProtein {
    pub id: String,
    pub name: String,
    pub organism: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    pub sequence: Sequence,
    /// Precomputed structural-confidence baseline, if the source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_baseline: Option<f64>,
}

impl ReferenceProtein {
    pub fn new(id: &str, name: &str, organism: &str, sequence: Sequence) -> Self {
        ReferenceProtein {
            id: id.to_string(),
            name: name.to_string(),
            organism: organism.to_string(),
            function: None,
            sequence,
            confidence_baseline: None,
        }
    }

    pub fn with_function(mut self, function: &str) -> Self {
        self.function = Some(function.to_string());
        self
    }

    pub fn with_confidence_baseline(mut self, baseline: f64) -> Self {
        self.confidence_baseline = Some(baseline);
        self
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

/// Outcome of looking a query up in the catalogue.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Exact(ReferenceProtein),
    Similar(ReferenceProtein, f64),
    NoMatch,
}

/// Positional identity over the shorter sequence.
///
/// Returns 0 for empty input or when the lengths differ by more than 10 % of
/// the longer one.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let longest = a.len().max(b.len());
    let shortest = a.len().min(b.len());
    if (longest - shortest) as f64 / longest as f64 > MAX_LENGTH_DIFFERENCE {
        return 0.0;
    }
    let matches = a.iter().zip(b).filter(|(x, y)| x == y).count();
    matches as f64 / shortest as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueStatistics {
    pub total_proteins: usize,
    pub avg_length: f64,
    pub min_length: usize,
    pub max_length: usize,
    pub organisms: Vec<String>,
}

/// Reference proteins in load order.
///
/// The catalogue is never mutated in place; [`Catalogue::with_protein`] returns
/// a new value so concurrent readers can share the old one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    proteins: Vec<ReferenceProtein>,
}

impl Catalogue {
    pub fn new(proteins: Vec<ReferenceProtein>) -> Self {
        Catalogue { proteins }
    }

    /// Built-in fallback used when no catalogue source can be loaded.
    pub fn embedded() -> Self {
        let entries = [
            (
                "P68871",
                "Hemoglobin subunit beta",
                "Oxygen transport",
                HBB_SEQUENCE,
            ),
            (
                "P69905",
                "Hemoglobin subunit alpha",
                "Oxygen transport",
                HBA_SEQUENCE,
            ),
            (
                "P02100",
                "Hemoglobin subunit epsilon",
                "Embryonic oxygen transport",
                HBE_SEQUENCE,
            ),
        ];
        let proteins = entries
            .iter()
            .filter_map(|(id, name, function, seq)| {
                Sequence::parse(seq).ok().map(|sequence| {
                    ReferenceProtein::new(id, name, "Homo sapiens", sequence)
                        .with_function(function)
                        .with_confidence_baseline(95.0)
                })
            })
            .collect();
        Catalogue { proteins }
    }

    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ReferenceProtein> {
        self.proteins.iter().find(|p| p.id == id)
    }

    /// First protein whose sequence equals the query.
    pub fn exact_match(&self, seq: &Sequence) -> Option<&ReferenceProtein> {
        self.proteins.iter().find(|p| &p.sequence == seq)
    }

    /// Proteins at or above `min_similarity`, most similar first.
    pub fn similar_matches(
        &self,
        seq: &Sequence,
        min_similarity: f64,
    ) -> Vec<(&ReferenceProtein, f64)> {
        self.proteins
            .iter()
            .map(|p| (p, similarity(seq.as_str(), p.sequence.as_str())))
            .filter(|(_, sim)| *sim >= min_similarity)
            // stable sort keeps load order among ties
            .sorted_by(|a, b| b.1.total_cmp(&a.1))
            .collect()
    }

    /// Exact match first, then the best near-identical match.
    pub fn lookup(&self, seq: &Sequence, min_similarity: f64) -> MatchResult {
        if let Some(protein) = self.exact_match(seq) {
            debug!("exact catalogue match: {}", protein.id);
            return MatchResult::Exact(protein.clone());
        }
        match self.similar_matches(seq, min_similarity).first() {
            Some((protein, sim)) => {
                debug!("similar catalogue match: {} ({:.4})", protein.id, sim);
                MatchResult::Similar((*protein).clone(), *sim)
            }
            None => MatchResult::NoMatch,
        }
    }

    /// Returns a new catalogue with `protein` appended. In-memory only.
    pub fn with_protein(&self, protein: ReferenceProtein) -> Catalogue {
        let mut proteins = self.proteins.clone();
        proteins.push(protein);
        Catalogue { proteins }
    }

    /// `(id, name, length)` for every protein.
    pub fn list(&self) -> Vec<(&str, &str, usize)> {
        self.proteins
            .iter()
            .map(|p| (p.id.as_str(), p.name.as_str(), p.len()))
            .collect()
    }

    pub fn statistics(&self) -> Option<CatalogueStatistics> {
        let lengths: Vec<usize> = self.proteins.iter().map(ReferenceProtein::len).collect();
        let (min_length, max_length) = lengths.iter().copied().minmax().into_option()?;
        Some(CatalogueStatistics {
            total_proteins: self.proteins.len(),
            avg_length: lengths.iter().sum::<usize>() as f64 / lengths.len() as f64,
            min_length,
            max_length,
            organisms: self
                .proteins
                .iter()
                .map(|p| p.organism.clone())
                .unique()
                .sorted()
                .collect(),
        })
    }
}

const HBB_SEQUENCE: &str = "MVHLTPEEKSAVTALWGKVNVDEVGGEALGRLLVVYPWTQRFFESFGDLSTPDAVMGNPKVKAHGKKVLGAFSDGLAHLDNLKGTFATLSELHCDKLHVDPENFRLLGNVLVCVLAHHFGKEFTPPVQAAYQKVVAGVANALAHKYH";
const HBA_SEQUENCE: &str = "MVLSPADKTNVKAAWGKVGAHAGEYGAEALERMFLSFPTTKTYFPHFDLSHGSAQVKGHGKKVADALTNAVAHVDDMPNALSALSDLHAHKLRVDPVNFKLLSHCLLVTLAAHLPAEFTPAVHASLDKFLASVSTVLTSKYR";
const HBE_SEQUENCE: &str = "MVHFTAEEKAAVTSLWSKMNVEEAGGEALGRLLVVYPWTQRFFDSFGNLSSPSAILGNPKVKAHGKKVLTSFGDAIKNMDNLKPAFAKLSELHCDKLHVDPENFKLLGNVMVIILATHFGKEFTPEVQAAWQKLVSAVAIALAHKYH";
