use climate_energy::{MasterDatasetCache, Pipeline, PipelineConfig, PipelineError};
use std::env;
use std::path::Path;

fn main() -> Result<(), PipelineError> {
    let config = match env::args().nth(1) {
        Some(path) => PipelineConfig::from_json_file(Path::new(&path))?,
        None => PipelineConfig::default(),
    };
    let pipeline = Pipeline::new(config)?;

    let output = match pipeline.run_files() {
        Ok(output) => output,
        Err(e) if e.is_source_not_found() => {
            eprintln!("{e}. Fetch the raw weather and energy files first.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    println!(
        "Merged {} region-months ({} weather-only, {} energy-only dropped)",
        output.merge_report.joined_rows,
        output.merge_report.weather_only(),
        output.merge_report.energy_only()
    );
    for warning in &output.warnings {
        println!("warning: {warning}");
    }

    let mut cache = MasterDatasetCache::new(&pipeline.config().paths.master);
    let master = cache.get()?;
    for region in master.regions() {
        let analysis = pipeline.analyze_region(&master, region.name())?;
        let metrics = analysis.metrics;
        println!(
            "{:<20} max temp {:>5.1} °C | generation {:>10.0} GWh | solar {:>5.1}% | humidity {:>5.1}%",
            region.name(),
            metrics.mean_max_temp,
            metrics.total_generation,
            metrics.solar_contribution,
            metrics.mean_humidity
        );
        println!("    {}", analysis.correlation);
        for notice in analysis.notices() {
            println!("    note: {notice}");
        }
    }
    Ok(())
}
