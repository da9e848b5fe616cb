use mutscope_core::validate_and_diff;

pub fn execute(original: &str, mutated: &str, max_mutations: usize) -> anyhow::Result<()> {
    let pair = validate_and_diff(original, mutated, max_mutations)?;
    let summary = pair.mutations.summary();
    println!(
        "{} mutation(s) over {} residues: {}",
        summary.total_mutations,
        pair.original.len(),
        summary.description
    );
    for m in &summary.mutations {
        println!(
            "  {:<8} {} -> {}",
            m.notation, m.original_name, m.mutated_name
        );
    }
    Ok(())
}
