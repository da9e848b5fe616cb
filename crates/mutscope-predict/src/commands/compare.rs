use anyhow::Context;
use log::info;
use mutscope_predict::{run_comparison, write_report, EngineConfig, StructurePredictionService};
use std::path::Path;

pub fn execute(
    config: &EngineConfig,
    original: &str,
    mutated: &str,
    name: &str,
    report: Option<&Path>,
) -> anyhow::Result<()> {
    let service = StructurePredictionService::from_config(config);
    let result = run_comparison(&service, original, mutated, name, config.max_mutations)
        .with_context(|| format!("running comparison {name}"))?;
    match report {
        Some(path) => {
            write_report(path, &result)?;
            info!("report written to {}", path.display());
            let c = &result.comparison;
            println!(
                "{}: {} {} | displacement {:.3} | delta {:+.2}",
                name, c.magnitude, c.effect, c.displacement, c.confidence_delta
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(())
}
