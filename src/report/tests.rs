use super::*;
use crate::pipeline::{AnalysisPipeline, Batch};
use crate::sample::{DEFAULT_CURRENT_COLUMN, DEFAULT_POTENTIAL_COLUMN};
use crate::table::{Column, DataTable};

fn sweep(scale: f64) -> DataTable {
    DataTable::new()
        .with_column(Column::numeric(
            DEFAULT_POTENTIAL_COLUMN,
            vec![0.0, 0.1, 0.2, 0.3, 0.4],
        ))
        .with_column(Column::numeric(
            DEFAULT_CURRENT_COLUMN,
            vec![0.0, scale * 1e-7, 0.0, scale * 2e-7, 0.0],
        ))
}

fn result() -> BatchResult {
    let mut batch: Batch = [
        ("2_mu_M", sweep(2.0)),
        ("1_mu_M", sweep(1.0)),
        ("blank", sweep(0.5)),
    ]
    .into_iter()
    .collect();
    batch.push("broken", DataTable::new());
    AnalysisPipeline::default().run(batch)
}

#[test]
fn test_default_headers() {
    assert_eq!(
        table_headers(&ChannelLabels::default()),
        [
            "File",
            "HQ_Peak_Potential(V)",
            "CC_Peak_Potential(V)",
            "HQ_Peak_Current(A)",
            "CC_Peak_Current(A)",
            "Concentration(μM)",
        ]
    );
}

#[test]
fn test_table_cells() {
    let result = result();
    let labels = ChannelLabels::default();
    let table = BatchReport::new(&result, &labels).table();

    assert_eq!(table.len(), 4);
    assert_eq!(table[1], ["1_mu_M", "0.1", "0.3", "1.00e-07", "2.00e-07", "1"]);
    assert_eq!(table[3][0], "blank");
    assert_eq!(table[3][5], "");
}

#[test]
fn test_csv_output() {
    let result = result();
    let labels = ChannelLabels::default();
    let mut buffer = Vec::new();
    BatchReport::new(&result, &labels).write_csv(&mut buffer).unwrap();

    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "File,HQ_Peak_Potential(V),CC_Peak_Potential(V),HQ_Peak_Current(A),CC_Peak_Current(A),Concentration(μM)"
    );
    assert_eq!(lines.next().unwrap(), "1_mu_M,0.1,0.3,1.00e-07,2.00e-07,1");
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_text_report_lists_equations_and_skips() {
    let result = result();
    let labels = ChannelLabels::default();
    let text = BatchReport::new(&result, &labels).to_string();

    assert!(text.contains("Peak Analysis"));
    assert!(text.contains("HQ: Current(A) = 1e-07[HQ] + "));
    assert!(text.contains("CC: Current(A) = 2e-07[CC] + "));
    assert!(text.contains("Skipped 1 file(s)"));
    assert!(text.contains("broken - missing required columns"));
}

#[test]
fn test_json_document() {
    let result = result();
    let labels = ChannelLabels::default();
    let json = BatchReport::new(&result, &labels).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["rows"].as_array().unwrap().len(), 3);
    assert_eq!(value["rows"][0]["file"], "1_mu_M");
    assert_eq!(value["rows"][2]["concentration_um"], serde_json::Value::Null);
    assert_eq!(value["calibrations"][0]["label"], "HQ");
    assert_eq!(value["calibrations"][0]["fit"]["points"], 2);
    assert_eq!(value["skipped"][0]["identifier"], "broken");
    assert_eq!(value["skipped"][0]["reason"]["kind"], "missing_columns");
}
