//! Structure files.
//!
//! Synthesized traces are written as minimal PDB files: one `CA` atom per
//! residue, occupancy fixed at 1.00 and the per-residue confidence stored in
//! the temperature-factor column. Files are read back through `pdbtbx`.

use chrono::Utc;
use itertools::Itertools;
use log::{debug, warn};
use mutscope_core::geometry::{BackboneTrace, Vec3};
use mutscope_core::info::constants::aa1to3;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Residue names per SEQRES line.
const SEQRES_PER_LINE: usize = 13;

/// Largest residue number that fits the 4 column `resSeq` field.
pub const MAX_RESIDUES: usize = 9999;

/// Coordinate limits of the 8 column `%8.3f` fields.
const MAX_COORDINATE: f64 = 9999.999;
const MIN_COORDINATE: f64 = -999.999;

/// Database fields of the DBREF record that anchors SEQRES numbering.
const DBREF_ID_CODE: &str = "MUTS";
const DBREF_DATABASE: &str = "SYNTH";
const DBREF_ACCESSION: &str = "MUTSCOPE";
const DBREF_DB_ID_CODE: &str = "CA_TRACE";

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("sequence has {residues} residues but the trace has {coords} positions")]
    LengthMismatch { residues: usize, coords: usize },

    #[error("{values} confidence values for {residues} residues")]
    ConfidenceMismatch { residues: usize, values: usize },

    #[error("{residues} residues do not fit a PDB file (at most {max})")]
    TooManyResidues { residues: usize, max: usize },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Formats accepted from a remote structure database.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Cif,
}

impl StructureFormat {
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Cif => "cif",
        }
    }

    /// Detect the format of a downloaded payload. `None` when the text has no
    /// atom records.
    pub fn detect(text: &str) -> Option<Self> {
        let has_atoms = text
            .lines()
            .any(|line| line.starts_with("ATOM") || line.starts_with("HETATM"));
        if !has_atoms {
            return None;
        }
        if text.trim_start().starts_with("data_") {
            Some(Self::Cif)
        } else {
            Some(Self::Pdb)
        }
    }
}

fn check_coordinate(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_COORDINATE, MAX_COORDINATE)
    } else {
        0.0
    }
}

/// DBREF, then SEQRES for chain A. pdbtbx numbers SEQRES entries from the
/// DBREF start, so the two records travel together.
fn entity_records(residues: &[&str]) -> Vec<String> {
    let n = residues.len();
    let dbref = format!(
        "DBREF  {:<4} A {:>4}  {:>4}  {:<6} {:<8} {:<12} {:>5}  {:>5} ",
        DBREF_ID_CODE, 1, n, DBREF_DATABASE, DBREF_ACCESSION, DBREF_DB_ID_CODE, 1, n
    );
    std::iter::once(format!("{dbref:<80}"))
        .chain(
            residues
                .chunks(SEQRES_PER_LINE)
                .enumerate()
                .map(|(i, chunk)| format!("SEQRES {:>3} A {:>4}  {}", i + 1, n, chunk.join(" "))),
        )
        .collect()
}

/// Render a Cα-only PDB file for `sequence` placed along `trace`.
pub fn render_pdb(
    job_name: &str,
    sequence: &str,
    trace: &BackboneTrace,
    confidence: &[f64],
) -> Result<String, StructureError> {
    let residues: Vec<&'static str> = sequence.chars().map(aa1to3).collect();
    if residues.len() != trace.len() {
        return Err(StructureError::LengthMismatch {
            residues: residues.len(),
            coords: trace.len(),
        });
    }
    if confidence.len() != residues.len() {
        return Err(StructureError::ConfidenceMismatch {
            residues: residues.len(),
            values: confidence.len(),
        });
    }
    if residues.len() > MAX_RESIDUES {
        return Err(StructureError::TooManyResidues {
            residues: residues.len(),
            max: MAX_RESIDUES,
        });
    }

    let date = Utc::now().format("%d-%b-%y").to_string().to_uppercase();
    let mut records = vec![
        format!("HEADER    {:<40}{:<9}   {:<4}", "PREDICTED STRUCTURE", date, DBREF_ID_CODE),
        format!("TITLE     SYNTHESIZED CA TRACE FOR {}", job_name.to_uppercase()),
    ];
    if !residues.is_empty() {
        records.extend(entity_records(&residues));
    }
    records.extend(
        residues
            .iter()
            .zip(trace.coords())
            .zip(confidence)
            .enumerate()
            .map(|(i, ((res, pos), b))| {
                let [x, y, z]: Vec3 = (*pos).map(check_coordinate);
                format!(
                    "ATOM  {:>5}  CA  {:>3} A{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}           C",
                    i + 1,
                    res,
                    i + 1,
                    x,
                    y,
                    z,
                    1.0,
                    b.clamp(0.0, 100.0)
                )
            }),
    );
    if let Some(last) = residues.last() {
        records.push(format!(
            "TER   {:>5}      {:>3} A{:>4}",
            residues.len() + 1,
            last,
            residues.len()
        ));
    }
    records.push("END".to_string());

    let mut out = records.join("\n");
    out.push('\n');
    Ok(out)
}

/// Render and write a structure file, returning the number of bytes written.
pub fn write_structure(
    path: &Path,
    job_name: &str,
    sequence: &str,
    trace: &BackboneTrace,
    confidence: &[f64],
) -> Result<usize, StructureError> {
    let contents = render_pdb(job_name, sequence, trace, confidence)?;
    fs::write(path, &contents).map_err(|source| StructureError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("wrote {} residues to {}", trace.len(), path.display());
    Ok(contents.len())
}

/// Write a downloaded structure unchanged.
pub fn write_text(path: &Path, contents: &str) -> Result<(), StructureError> {
    fs::write(path, contents).map_err(|source| StructureError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Cα atoms of a parsed structure file, in file order.
#[derive(Debug, Clone)]
pub struct CaTrace {
    pub residue_names: Vec<String>,
    pub trace: BackboneTrace,
    pub b_factors: Vec<f64>,
}

impl CaTrace {
    pub fn len(&self) -> usize {
        self.residue_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residue_names.is_empty()
    }
}

/// Parse a PDB or mmCIF file and collect its Cα atoms.
pub fn read_ca_trace(path: &Path) -> Result<CaTrace, StructureError> {
    let path_str = path.to_string_lossy().into_owned();
    let (pdb, errors) = pdbtbx::open(&path_str).map_err(|errors| StructureError::Parse {
        path: path.to_path_buf(),
        message: errors.iter().map(|e| e.to_string()).join("; "),
    })?;
    for error in &errors {
        warn!("{}: {}", path.display(), error);
    }

    // PDB --> Chain --> Residue --> Atom
    let (residue_names, coords, b_factors): (Vec<String>, Vec<Vec3>, Vec<f64>) = pdb
        .chains()
        .flat_map(|chain| {
            chain.residues().flat_map(|residue| {
                let name = residue.name().unwrap_or_default().to_string();
                residue
                    .atoms()
                    .filter(|atom| atom.name() == "CA")
                    .map(move |atom| {
                        let (x, y, z) = atom.pos();
                        (name.clone(), [x, y, z], atom.b_factor())
                    })
            })
        })
        .multiunzip();

    Ok(CaTrace {
        residue_names,
        trace: BackboneTrace::new(coords),
        b_factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscope_core::geometry::build_trace;
    use mutscope_core::secondary::predict_secondary_structure;
    use mutscope_test_data::TestFile;
    use tempfile::tempdir;

    const SEQ: &str = "MVHLTPEEKSAVTALWGKV";

    fn synthesized() -> (BackboneTrace, Vec<f64>) {
        let profile = predict_secondary_structure(SEQ);
        let trace = build_trace(SEQ.len(), profile.labels());
        let confidence = (0..SEQ.len()).map(|i| 40.0 + i as f64).collect();
        (trace, confidence)
    }

    #[test]
    fn test_render_columns() {
        let (trace, confidence) = synthesized();
        let text = render_pdb("hbb_test", SEQ, &trace, &confidence).unwrap();
        assert!(text.ends_with("END\n"));
        assert!(text.lines().next().unwrap().starts_with("HEADER    PREDICTED STRUCTURE"));
        assert!(text.contains("TITLE     SYNTHESIZED CA TRACE FOR HBB_TEST\n"));

        let seqres: Vec<&str> = text.lines().filter(|l| l.starts_with("SEQRES")).collect();
        assert_eq!(seqres.len(), 2);
        assert_eq!(&seqres[0][..26], "SEQRES   1 A   19  MET VAL");
        let dbref = text.lines().nth(2).unwrap();
        assert_eq!(&dbref[..24], "DBREF  MUTS A    1    19");
        assert_eq!(dbref.len(), 80);

        let atoms: Vec<&str> = text.lines().filter(|l| l.starts_with("ATOM")).collect();
        assert_eq!(atoms.len(), SEQ.len());
        let first = atoms[0];
        assert_eq!(&first[12..16], " CA ");
        assert_eq!(&first[17..20], "MET");
        assert_eq!(&first[22..26], "   1");
        assert_eq!(&first[30..38], "   0.000");
        assert_eq!(&first[54..60], "  1.00");
        assert_eq!(&first[60..66], " 40.00");
        assert_eq!(&first[76..78], " C");
        assert_eq!(&atoms[18][17..20], "VAL");
        assert_eq!(&atoms[18][22..26], "  19");
    }

    #[test]
    fn test_render_rejects_mismatched_lengths() {
        let (trace, confidence) = synthesized();
        assert!(matches!(
            render_pdb("x", "ARND", &trace, &confidence),
            Err(StructureError::LengthMismatch { residues: 4, .. })
        ));
        assert!(matches!(
            render_pdb("x", SEQ, &trace, &confidence[..3]),
            Err(StructureError::ConfidenceMismatch { values: 3, .. })
        ));
    }

    #[test]
    fn test_written_file_parses_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("roundtrip.pdb");
        let (trace, confidence) = synthesized();
        write_structure(&path, "roundtrip", SEQ, &trace, &confidence).unwrap();

        let ca = read_ca_trace(&path).unwrap();
        assert_eq!(ca.len(), SEQ.len());
        assert_eq!(ca.residue_names[0], "MET");
        assert_eq!(ca.residue_names[18], "VAL");
        for (a, b) in ca.trace.coords().iter().zip(trace.coords()) {
            for k in 0..3 {
                assert!((a[k] - b[k]).abs() < 1e-3);
            }
        }
        assert!((ca.b_factors[5] - 45.0).abs() < 1e-6);
    }

    #[test]
    fn test_full_length_chain_parses_back() {
        let catalogue = mutscope_core::Catalogue::embedded();
        let hbb = catalogue.get("P68871").unwrap().sequence.as_str().to_string();
        let profile = predict_secondary_structure(&hbb);
        let mut trace = build_trace(hbb.len(), profile.labels());
        mutscope_core::refine(&hbb, &mut trace, &mutscope_core::RefinementParams::default());
        let confidence = vec![81.25; hbb.len()];

        let dir = tempdir().unwrap();
        let path = dir.path().join("hbb.pdb");
        write_structure(&path, "hbb", &hbb, &trace, &confidence).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("SEQRES")).count(), 12);

        let ca = read_ca_trace(&path).unwrap();
        assert_eq!(ca.len(), 147);
        assert_eq!(ca.residue_names[0], "MET");
        assert_eq!(ca.residue_names[146], "HIS");
        assert!(ca.b_factors.iter().all(|&b| (b - 81.25).abs() < 1e-6));
    }

    #[test]
    fn test_render_rejects_oversized_chains() {
        let n = MAX_RESIDUES + 1;
        let seq = "A".repeat(n);
        let trace = BackboneTrace::new(vec![[0.0, 0.0, 0.0]; n]);
        let err = render_pdb("big", &seq, &trace, &vec![50.0; n]).unwrap_err();
        assert!(matches!(
            err,
            StructureError::TooManyResidues { residues, max: MAX_RESIDUES } if residues == n
        ));
    }

    #[test]
    fn test_out_of_range_coordinates_keep_columns() {
        let trace = BackboneTrace::new(vec![[-12345.6, 12345.6, f64::NAN]]);
        let text = render_pdb("far", "A", &trace, &[50.0]).unwrap();
        let atom = text.lines().find(|l| l.starts_with("ATOM")).unwrap();
        assert_eq!(atom.len(), 78);
        assert_eq!(&atom[30..38], "-999.999");
        assert_eq!(&atom[38..46], "9999.999");
        assert_eq!(&atom[46..54], "   0.000");
    }

    #[test]
    fn test_read_fixture() {
        let (path, _temp) = TestFile::structure_01().create_temp().unwrap();
        let ca = read_ca_trace(Path::new(&path)).unwrap();
        assert_eq!(ca.len(), 12);
        assert_eq!(ca.residue_names[11], "VAL");
        assert!(ca.b_factors.iter().all(|&b| b == 80.0));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("x.pdb");
        let (trace, confidence) = synthesized();
        let err = write_structure(&path, "x", SEQ, &trace, &confidence).unwrap_err();
        assert!(matches!(err, StructureError::Write { .. }));
    }

    #[test]
    fn test_detect_format() {
        let pdb = std::str::from_utf8(TestFile::structure_01().bytes()).unwrap();
        assert_eq!(StructureFormat::detect(pdb), Some(StructureFormat::Pdb));
        let cif = "data_AF-P68871-F1\n#\nloop_\n_atom_site.group_PDB\nATOM 1 N N . MET A 1 1\n";
        assert_eq!(StructureFormat::detect(cif), Some(StructureFormat::Cif));
        assert_eq!(StructureFormat::detect("<html>not found</html>"), None);
    }
}
