//! mutscope-test-data
//!
//! Test fixtures embedded in the crate.
//!
//! Each fixture is a `TestFile` that packages the raw bytes and can write them
//! to a temporary file for code that expects a path.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use mutscope_test_data::TestFile;
/// let (catalogue, _temp) = TestFile::catalogue_01().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// Catalogue source with 3 usable proteins (hemoglobin beta, insulin,
    /// lysozyme) plus an entry with ambiguous residues, one whose `length`
    /// disagrees with its sequence and a duplicate of hemoglobin beta.
    pub fn catalogue_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/catalogue/catalogue_01.json"),
            suffix: "json",
        }
    }
    /// Truncated JSON.
    pub fn catalogue_corrupt() -> Self {
        Self {
            filebinary: include_bytes!("../data/catalogue/corrupt.json"),
            suffix: "json",
        }
    }
    /// 12 residue Cα trace of the hemoglobin beta N-terminus, `MVHLTPEEKSAV`.
    pub fn structure_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/structures/hbb_nterm_ca.pdb"),
            suffix: "pdb",
        }
    }

    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
