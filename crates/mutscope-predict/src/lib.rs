//! # mutscope-predict
//!
//! Prediction service, pair orchestration and comparison reports, plus the
//! `mutscope` command line front end.
//!
//! ```ignore
//! use mutscope_predict::{run_comparison, EngineConfig, StructurePredictionService};
//!
//! let config = EngineConfig::default();
//! let service = StructurePredictionService::from_config(&config);
//! let report = run_comparison(&service, wild_type, mutant, "hbb_e6v", config.max_mutations)?;
//! ```
pub mod config;
pub mod error;
pub mod report;
pub mod service;

pub use config::{ConfigError, EngineConfig, RemoteConfig};
pub use error::PredictionError;
pub use report::{compare_structures, run_comparison, write_report, ComparisonReport};
pub use service::StructurePredictionService;
