use anyhow::{bail, Context, Result};
use log::info;
use std::path::{Path, PathBuf};

use dpvcal::label::ConcentrationLabel;
use dpvcal::sample::{DEFAULT_CURRENT_COLUMN, DEFAULT_POTENTIAL_COLUMN};

/// Raw (non-differential) current column written by the potentiostat
const RAW_CURRENT_COLUMN: &str = "WE(1).Current (A)";

/// File names of the demo standards, lowest to highest concentration
pub const STANDARDS: [&str; 8] = [
    "500_n_M", "1_mu_M", "2_mu_M", "5_mu_M", "10_mu_M", "20_mu_M", "50_mu_M", "100_mu_M",
];

/// Sweep range and step in mV
const SWEEP_START_MV: i32 = -200;
const SWEEP_END_MV: i32 = 600;
const SWEEP_STEP_MV: usize = 5;

/// (center V, width V, sensitivity A/μM) for the two analytes
const ANALYTES: [(f64, f64, f64); 2] = [(0.1, 0.03, 2.0e-8), (0.2, 0.035, 1.2e-8)];

/// Baseline current in A
const BASELINE: f64 = 5.0e-9;

/// Generate a synthetic calibration series
pub fn run(dir: PathBuf, count: usize) -> Result<()> {
    if count == 0 || count > STANDARDS.len() {
        bail!("Count must be between 1 and {}", STANDARDS.len());
    }

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    info!("Writing {} standard(s) to {}", count, dir.display());

    for name in &STANDARDS[..count] {
        let label = ConcentrationLabel::parse(name);
        let concentration = label
            .micromolar
            .with_context(|| format!("Standard has no concentration: {}", name))?;

        let path = dir.join(format!("{}.csv", name));
        write_sweep(&path, concentration)?;
        info!("  {} ({} μM)", path.display(), concentration);
    }

    println!("Wrote {} file(s) to {}", count, dir.display());
    Ok(())
}

fn write_sweep(path: &Path, concentration: f64) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        DEFAULT_POTENTIAL_COLUMN,
        RAW_CURRENT_COLUMN,
        DEFAULT_CURRENT_COLUMN,
    ])?;

    for potential in sweep_potentials() {
        let delta = differential_current(potential, concentration);
        // The raw trace rides on a sloping background
        let raw = delta + BASELINE * (1.0 + potential);
        writer.write_record([
            format!("{:.3}", potential),
            format!("{:e}", raw),
            format!("{:e}", delta),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn sweep_potentials() -> impl Iterator<Item = f64> {
    (SWEEP_START_MV..=SWEEP_END_MV)
        .step_by(SWEEP_STEP_MV)
        .map(|mv| f64::from(mv) / 1000.0)
}

fn differential_current(potential: f64, concentration: f64) -> f64 {
    let signal: f64 = ANALYTES
        .iter()
        .map(|(center, width, sensitivity)| {
            let z = (potential - center) / width;
            sensitivity * concentration * (-0.5 * z * z).exp()
        })
        .sum();
    signal + BASELINE
}
