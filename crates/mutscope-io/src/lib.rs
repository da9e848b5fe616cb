//! # mutscope-io
//!
//! Everything that leaves the process: structure files, catalogue sources and
//! remote structure databases.
pub mod catalogue;
pub mod remote;
pub mod structure;

pub use catalogue::{load_catalogue, read_catalogue, CatalogueError};
pub use remote::{AlphaFoldDbClient, FetchError, FetchedStructure, OfflineSource, StructureSource};
pub use structure::{read_ca_trace, render_pdb, write_structure, CaTrace, StructureError, StructureFormat};
