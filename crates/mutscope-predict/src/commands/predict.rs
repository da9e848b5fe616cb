use anyhow::Context;
use mutscope_core::Sequence;
use mutscope_predict::{EngineConfig, StructurePredictionService};

pub fn execute(config: &EngineConfig, sequence: &str, job_name: &str) -> anyhow::Result<()> {
    let sequence = Sequence::parse(sequence)?;
    let service = StructurePredictionService::from_config(config);
    let record = service
        .predict_structure(&sequence, job_name)
        .with_context(|| format!("predicting structure for {job_name}"))?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
