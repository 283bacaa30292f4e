//! Integration tests for dpvcal
//!
//! These tests drive the full path from exports on disk to calibration lines.

use dpvcal::ingest::{load_batch, IngestOptions};
use dpvcal::peaks::Channel;
use dpvcal::pipeline::{AnalysisPipeline, ChannelLabels, PipelineConfig, SkipReason};
use dpvcal::report::BatchReport;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const HEADER: &str = "Potential applied (V),WE(1).Current (A),WE(1).δ.Current (A)";

/// Two Gaussian peaks at 0.1 V and 0.25 V scaled by concentration
fn sweep_csv(concentration: f64, delimiter: char) -> String {
    let mut csv = HEADER.replace(',', &delimiter.to_string());
    csv.push('\n');
    for mv in (-200..=500).step_by(10) {
        let potential = f64::from(mv) / 1000.0;
        let g1 = (-0.5 * ((potential - 0.1) / 0.03).powi(2)).exp();
        let g2 = (-0.5 * ((potential - 0.25) / 0.03).powi(2)).exp();
        let current = concentration * (2e-8 * g1 + 1e-8 * g2);
        writeln!(
            csv,
            "{potential}{d}{raw:e}{d}{current:e}",
            d = delimiter,
            raw = current + 1e-9,
        )
        .unwrap();
    }
    csv
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_directory_batch_to_calibration() {
    let dir = tempdir().unwrap();
    write(dir.path(), "5_mu_M.csv", &sweep_csv(5.0, ','));
    write(dir.path(), "500_n_M.csv", &sweep_csv(0.5, ','));
    write(dir.path(), "1_mu_M.txt", &sweep_csv(1.0, '\t'));
    write(dir.path(), "blank.csv", &sweep_csv(0.2, ';'));
    write(dir.path(), "broken.csv", "Potential applied (V),Other\n0.1,2\n");
    write(dir.path(), "notes.md", "# not an export\n");

    let batch = load_batch(&[dir.path().to_path_buf()], &IngestOptions::default()).unwrap();
    assert_eq!(batch.len(), 5);

    let result = AnalysisPipeline::default().run(batch);

    let files: Vec<&str> = result.rows.iter().map(|row| row.file.as_str()).collect();
    assert_eq!(files, ["500_n_M", "1_mu_M", "5_mu_M", "blank"]);
    assert_eq!(result.unlabeled_count(), 1);

    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].identifier, "broken");
    assert_eq!(
        result.skipped[0].reason,
        SkipReason::MissingColumns {
            columns: vec!["WE(1).δ.Current (A)".to_string()]
        }
    );

    let row = result.row("5_mu_M").unwrap();
    let primary = row.peaks.channel(Channel::Primary).unwrap();
    let secondary = row.peaks.channel(Channel::Secondary).unwrap();
    assert!((primary.potential - 0.1).abs() < 1e-9);
    assert!((secondary.potential - 0.25).abs() < 1e-9);

    let hq = result.calibration(Channel::Primary).unwrap();
    assert_eq!(hq.fit.points, 3);
    assert!((hq.slope() - 2e-8).abs() < 1e-12);
    assert!(hq.intercept().abs() < 1e-12);
    assert!(hq.r_squared() > 0.999_999);

    let cc = result.calibration(Channel::Secondary).unwrap();
    assert!((cc.slope() - 1e-8).abs() < 1e-12);

    let estimate = hq.estimate_concentration(primary.current).unwrap();
    assert!((estimate - 5.0).abs() < 1e-6);
}

#[test]
fn test_report_outputs_from_disk() {
    let dir = tempdir().unwrap();
    write(dir.path(), "1_mu_M.csv", &sweep_csv(1.0, ','));
    write(dir.path(), "2_mu_M.csv", &sweep_csv(2.0, ','));

    let batch = load_batch(&[dir.path().to_path_buf()], &IngestOptions::default()).unwrap();
    let result = AnalysisPipeline::default().run(batch);
    let labels = ChannelLabels::default();
    let report = BatchReport::new(&result, &labels);

    let out = dir.path().join("peaks.csv");
    report
        .write_csv(fs::File::create(&out).unwrap())
        .unwrap();
    let written = fs::read_to_string(&out).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().starts_with("File,HQ_Peak_Potential(V)"));
    assert_eq!(lines.next().unwrap(), "1_mu_M,0.1,0.25,2.00e-08,1.00e-08,1");
    assert_eq!(lines.next().unwrap(), "2_mu_M,0.1,0.25,4.00e-08,2.00e-08,2");

    let text = report.to_string();
    assert!(text.contains("HQ: Current(A) = 2e-08[HQ] + "));
    assert!(text.contains("R² = 1.000"));
}

#[test]
fn test_custom_columns_and_labels() {
    let dir = tempdir().unwrap();
    let export = |scale: f64| format!("E,I\n0.0,0\n0.1,{}\n0.2,0\n", scale * 1e-7);
    write(dir.path(), "1_mu_M.csv", &export(1.0));
    write(dir.path(), "3_mu_M.csv", &export(3.0));

    let config: PipelineConfig = toml::from_str(
        r#"
        [columns]
        potential = "E"
        current = "I"

        [channels]
        primary = "DA"
        "#,
    )
    .unwrap();

    let batch = load_batch(&[dir.path().to_path_buf()], &IngestOptions::default()).unwrap();
    let pipeline = AnalysisPipeline::new(config);
    let result = pipeline.run(batch);

    assert!(result.skipped.is_empty());
    assert!(result.calibration(Channel::Secondary).is_none());
    let da = result.calibration(Channel::Primary).unwrap();
    assert!(da.equation().starts_with("Current(A) = 1e-07[DA]"));
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "1_mu_M.csv", &sweep_csv(1.0, ','));
    write(dir.path(), "2_mu_M.csv", "a,b\n1,2,3\n");

    let batch = load_batch(&[dir.path().to_path_buf()], &IngestOptions::default()).unwrap();
    let result = AnalysisPipeline::default().run(batch);

    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.skipped.len(), 1);
    assert!(matches!(
        result.skipped[0].reason,
        SkipReason::Unreadable { .. }
    ));
    assert!(result.calibration(Channel::Primary).is_none());
}
