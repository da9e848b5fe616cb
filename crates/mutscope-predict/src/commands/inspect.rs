use anyhow::Context;
use mutscope_io::read_ca_trace;
use std::path::Path;

pub fn execute(structure: &Path) -> anyhow::Result<()> {
    let ca = read_ca_trace(structure)
        .with_context(|| format!("reading {}", structure.display()))?;
    println!("{}: {} residues", structure.display(), ca.len());
    if let Some(rg) = ca.trace.radius_of_gyration() {
        println!("radius of gyration: {rg:.3}");
    }
    if !ca.b_factors.is_empty() {
        let mean = ca.b_factors.iter().sum::<f64>() / ca.b_factors.len() as f64;
        println!("mean per-residue confidence: {mean:.2}");
    }
    Ok(())
}
