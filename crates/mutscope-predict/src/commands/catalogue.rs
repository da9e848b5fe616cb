use mutscope_io::load_catalogue;
use mutscope_predict::EngineConfig;

pub fn execute(config: &EngineConfig) -> anyhow::Result<()> {
    let catalogue = load_catalogue(config.catalogue_path.as_deref());
    for (id, name, length) in catalogue.list() {
        println!("{id:<8} {length:>5}  {name}");
    }
    if let Some(stats) = catalogue.statistics() {
        println!(
            "{} proteins, length {}-{} (mean {:.1}), organisms: {}",
            stats.total_proteins,
            stats.min_length,
            stats.max_length,
            stats.avg_length,
            stats.organisms.join(", ")
        );
    }
    Ok(())
}
