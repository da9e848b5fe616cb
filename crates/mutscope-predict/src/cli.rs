use super::commands;
use anyhow::Context;
use clap::{Parser, Subcommand};
use mutscope_predict::EngineConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip remote structure lookups
    #[arg(long, global = true)]
    offline: bool,

    /// Directory for structure files
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    /// Catalogue source (JSON)
    #[arg(long, global = true)]
    catalogue: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the substitutions between two sequences
    Diff {
        #[arg(short, long)]
        original: String,
        #[arg(short, long)]
        mutated: String,
        #[arg(long)]
        max_mutations: Option<usize>,
    },
    /// Predict a structure for one sequence
    Predict {
        #[arg(short, long)]
        sequence: String,
        #[arg(short, long, default_value = "prediction")]
        job_name: String,
    },
    /// Predict and compare a wild type and a mutant
    Compare {
        #[arg(short, long)]
        original: String,
        #[arg(short, long)]
        mutated: String,
        #[arg(short, long, default_value = "comparison")]
        name: String,
        /// Write the report as JSON instead of printing it
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// List the known protein catalogue
    Catalogue,
    /// Summarize a structure file
    Inspect {
        #[arg(short, long)]
        structure: PathBuf,
    },
}

impl Cli {
    fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if self.offline {
            config.remote.enabled = false;
        }
        if let Some(dir) = &self.models_dir {
            config.models_directory = dir.clone();
        }
        if let Some(path) = &self.catalogue {
            config.catalogue_path = Some(path.clone());
        }
        Ok(config)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let config = self.engine_config()?;
        match self.command {
            Commands::Diff {
                original,
                mutated,
                max_mutations,
            } => commands::diff::execute(
                &original,
                &mutated,
                max_mutations.unwrap_or(config.max_mutations),
            ),
            Commands::Predict { sequence, job_name } => {
                commands::predict::execute(&config, &sequence, &job_name)
            }
            Commands::Compare {
                original,
                mutated,
                name,
                report,
            } => commands::compare::execute(&config, &original, &mutated, &name, report.as_deref()),
            Commands::Catalogue => commands::catalogue::execute(&config),
            Commands::Inspect { structure } => commands::inspect::execute(&structure),
        }
    }
}
