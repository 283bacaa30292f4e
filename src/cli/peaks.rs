use anyhow::{Context, Result};
use std::path::PathBuf;

use dpvcal::ingest::{read_table_file, sample_identifier};
use dpvcal::label::ConcentrationLabel;
use dpvcal::peaks::{Channel, PeakFinder, PeakFinderConfig};
use dpvcal::sample::Sample;

use super::config::Config;

/// Print every peak found in one export
pub fn run(file: PathBuf, config: Option<PathBuf>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let config = Config::load(config.as_deref())?;
    let options = config.ingest_options()?;
    let pipeline_config = config.pipeline_config();

    let identifier = sample_identifier(&file)
        .with_context(|| format!("No sample name in path: {}", file.display()))?;
    let table = read_table_file(&file, &options)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let sample = Sample::from_table(&identifier, &table, &pipeline_config.columns)
        .with_context(|| format!("Cannot analyze {}", file.display()))?;

    let finder = PeakFinder::new(pipeline_config.peaks.clone());
    let peaks = finder.find(&sample);
    let label = ConcentrationLabel::parse(&identifier);

    println!("Sample: {}", identifier);
    match label.micromolar {
        Some(value) => println!("Concentration: {} ({} μM)", label, value),
        None => println!("Concentration: {} (undefined)", label),
    }
    println!("Points: {}", sample.len());
    if let Some(filters) = describe_filters(&pipeline_config.peaks) {
        println!("Filters: {}", filters);
    }
    println!();

    if peaks.is_empty() {
        println!("No peaks found");
        return Ok(());
    }

    println!("{:>4}  {:>8}  {:>14}  {:>14}", "#", "Index", "Potential (V)", "Current (A)");
    for (i, peak) in peaks.iter().enumerate() {
        let channel = Channel::ALL
            .get(i)
            .map(|channel| pipeline_config.channels.get(*channel))
            .unwrap_or("");
        println!(
            "{:>4}  {:>8}  {:>14}  {:>14.3e}  {}",
            i + 1,
            peak.index,
            peak.potential,
            peak.current,
            channel
        );
    }

    if peaks.len() > Channel::ALL.len() {
        println!();
        println!(
            "{} peak(s) beyond the first two are not used for calibration",
            peaks.len() - Channel::ALL.len()
        );
    }

    Ok(())
}

/// One-line summary of the active peak filters, if any
fn describe_filters(config: &PeakFinderConfig) -> Option<String> {
    if !config.is_filtered() {
        return None;
    }

    let mut parts = Vec::new();
    if let Some(height) = config.min_height {
        parts.push(format!("height >= {:e} A", height));
    }
    if let Some(prominence) = config.min_prominence {
        parts.push(format!("prominence >= {:e} A", prominence));
    }
    if let Some(distance) = config.min_distance {
        parts.push(format!("distance >= {} points", distance));
    }
    Some(parts.join(", "))
}
