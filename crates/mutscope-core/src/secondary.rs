//! Sliding-window secondary structure assignment.
//!
//! Each residue is labelled from the Chou-Fasman helix and sheet propensities
//! averaged over a centered window of 7 residues, clipped at the chain ends.

use crate::info::constants::{helix_propensity, sheet_propensity};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{Display, EnumIter, EnumString};

/// Residues on either side of the center.
pub const WINDOW_HALF_WIDTH: usize = 3;

/// Minimum window average for an ordered element.
pub const PROPENSITY_THRESHOLD: f64 = 1.05;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize)]
pub enum SecondaryStructure {
    #[strum(serialize = "H")]
    Helix,
    #[strum(serialize = "E")]
    Sheet,
    #[strum(serialize = "C")]
    Coil,
}

impl SecondaryStructure {
    pub const fn code(&self) -> char {
        match self {
            Self::Helix => 'H',
            Self::Sheet => 'E',
            Self::Coil => 'C',
        }
    }

    pub const fn is_ordered(&self) -> bool {
        !matches!(self, Self::Coil)
    }
}

/// One label per residue, in sequence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecondaryStructureProfile {
    labels: Vec<SecondaryStructure>,
}

impl SecondaryStructureProfile {
    pub fn labels(&self) -> &[SecondaryStructure] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn fraction(&self, kind: SecondaryStructure) -> f64 {
        if self.labels.is_empty() {
            return 0.0;
        }
        self.labels.iter().filter(|&&l| l == kind).count() as f64 / self.labels.len() as f64
    }

    pub fn helix_fraction(&self) -> f64 {
        self.fraction(SecondaryStructure::Helix)
    }

    pub fn sheet_fraction(&self) -> f64 {
        self.fraction(SecondaryStructure::Sheet)
    }

    pub fn coil_fraction(&self) -> f64 {
        self.fraction(SecondaryStructure::Coil)
    }
}

impl fmt::Display for SecondaryStructureProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: String = self.labels.iter().map(SecondaryStructure::code).collect();
        f.write_str(&rendered)
    }
}

/// Label every residue of `residues`.
///
/// Accepts any string; symbols outside the table use the default propensity.
pub fn predict_secondary_structure(residues: &str) -> SecondaryStructureProfile {
    let chars: Vec<char> = residues.chars().collect();
    let n = chars.len();
    let labels = (0..n)
        .map(|i| {
            let start = i.saturating_sub(WINDOW_HALF_WIDTH);
            let end = (i + WINDOW_HALF_WIDTH + 1).min(n);
            let window = &chars[start..end];
            let width = window.len() as f64;
            let helix = window.iter().map(|&c| helix_propensity(c)).sum::<f64>() / width;
            let sheet = window.iter().map(|&c| sheet_propensity(c)).sum::<f64>() / width;
            classify(helix, sheet)
        })
        .collect();
    SecondaryStructureProfile { labels }
}

fn classify(helix: f64, sheet: f64) -> SecondaryStructure {
    if helix > PROPENSITY_THRESHOLD && helix > sheet {
        SecondaryStructure::Helix
    } else if sheet > PROPENSITY_THRESHOLD && sheet > helix {
        SecondaryStructure::Sheet
    } else {
        SecondaryStructure::Coil
    }
}
