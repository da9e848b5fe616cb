//! # Constants
//!
//! Per-residue tables used throughout the engine.
//!
//! ## Residue Table
//! Each of the 20 standard amino acids carries:
//!
//! - one- and three-letter codes and a display name
//! - Chou-Fasman helix and sheet propensities
//! - Kyte-Doolittle hydropathy (positive = hydrophobic)
//!
//! Symbols outside the alphabet fall back to neutral values so scoring code can
//! run over unvalidated input.
//!
use strum::{Display, EnumIter, EnumString};

/// Helix/sheet propensity used for symbols that are not in the table.
pub const DEFAULT_PROPENSITY: f64 = 1.0;

/// Largest hydropathy value in the table (isoleucine).
pub const MAX_HYDROPATHY: f64 = 4.5;

/// The 20 one-letter codes accepted by the validator.
pub const ALPHABET: [char; 20] = [
    'A', 'R', 'N', 'D', 'C', 'Q', 'E', 'G', 'H', 'I', 'L', 'K', 'M', 'F', 'P', 'S', 'T', 'W', 'Y',
    'V',
];

/// Symbols that show up in sequence databases but are not standard residues.
pub const RARE_SYMBOLS: [char; 6] = ['B', 'Z', 'J', 'U', 'O', 'X'];

macro_rules! define_amino_acids {
    ($($name:ident: $code3:expr, $code1:literal, $full:expr, $helix:expr, $sheet:expr, $hydro:expr),* $(,)?) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
        pub enum AminoAcid {
            $($name),*
        }

        impl AminoAcid {
            pub const fn code3(&self) -> &'static str {
                match self {
                    $(Self::$name => $code3),*
                }
            }
            pub const fn code1(&self) -> char {
                match self {
                    $(Self::$name => $code1),*
                }
            }
            pub const fn full_name(&self) -> &'static str {
                match self {
                    $(Self::$name => $full),*
                }
            }
            pub const fn helix_propensity(&self) -> f64 {
                match self {
                    $(Self::$name => $helix),*
                }
            }
            pub const fn sheet_propensity(&self) -> f64 {
                match self {
                    $(Self::$name => $sheet),*
                }
            }
            pub const fn hydropathy(&self) -> f64 {
                match self {
                    $(Self::$name => $hydro),*
                }
            }
            pub fn from_code1(code: char) -> Option<Self> {
                match code {
                    $($code1 => Some(Self::$name),)*
                    _ => None,
                }
            }
        }
    }
}

#[rustfmt::skip]
define_amino_acids! {
    //    code3  code1  name               P(a)  P(b)  KD
    ALA: "ALA", 'A', "Alanine",          1.42, 0.83,  1.8,
    ARG: "ARG", 'R', "Arginine",         0.98, 0.93, -4.5,
    ASN: "ASN", 'N', "Asparagine",       0.67, 0.89, -3.5,
    ASP: "ASP", 'D', "Aspartic acid",    1.01, 0.54, -3.5,
    CYS: "CYS", 'C', "Cysteine",         0.70, 1.19,  2.5,
    GLN: "GLN", 'Q', "Glutamine",        1.11, 1.10, -3.5,
    GLU: "GLU", 'E', "Glutamic acid",    1.51, 0.37, -3.5,
    GLY: "GLY", 'G', "Glycine",          0.57, 0.75, -0.4,
    HIS: "HIS", 'H', "Histidine",        1.00, 0.87, -3.2,
    ILE: "ILE", 'I', "Isoleucine",       1.08, 1.60,  4.5,
    LEU: "LEU", 'L', "Leucine",          1.21, 1.30,  3.8,
    LYS: "LYS", 'K', "Lysine",           1.16, 0.74, -3.9,
    MET: "MET", 'M', "Methionine",       1.45, 1.05,  1.9,
    PHE: "PHE", 'F', "Phenylalanine",    1.13, 1.38,  2.8,
    PRO: "PRO", 'P', "Proline",          0.57, 0.55, -1.6,
    SER: "SER", 'S', "Serine",           0.77, 0.75, -0.8,
    THR: "THR", 'T', "Threonine",        0.83, 1.19, -0.7,
    TRP: "TRP", 'W', "Tryptophan",       1.08, 1.37, -0.9,
    TYR: "TYR", 'Y', "Tyrosine",         0.69, 1.47, -1.3,
    VAL: "VAL", 'V', "Valine",           1.06, 1.70,  4.2,
}

pub fn is_amino_acid(code: char) -> bool {
    AminoAcid::from_code1(code).is_some()
}

/// Three-letter code for a one-letter symbol, `UNK` when unknown.
pub fn aa1to3(code: char) -> &'static str {
    AminoAcid::from_code1(code).map_or("UNK", |aa| aa.code3())
}

pub fn helix_propensity(code: char) -> f64 {
    AminoAcid::from_code1(code).map_or(DEFAULT_PROPENSITY, |aa| aa.helix_propensity())
}

pub fn sheet_propensity(code: char) -> f64 {
    AminoAcid::from_code1(code).map_or(DEFAULT_PROPENSITY, |aa| aa.sheet_propensity())
}

pub fn hydropathy(code: char) -> f64 {
    AminoAcid::from_code1(code).map_or(0.0, |aa| aa.hydropathy())
}
