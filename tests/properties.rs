//! Property-based tests for label decoding, peak picking and batch ordering

use dpvcal::calibration::fit_linear;
use dpvcal::label::{ConcentrationLabel, ConcentrationUnit};
use dpvcal::peaks::{local_maxima, PeakFinder, PeakFinderConfig};
use dpvcal::pipeline::{AnalysisPipeline, Batch};
use dpvcal::sample::{DEFAULT_CURRENT_COLUMN, DEFAULT_POTENTIAL_COLUMN};
use dpvcal::table::{Column, DataTable};
use proptest::prelude::*;

fn unit_strategy() -> impl Strategy<Value = ConcentrationUnit> {
    prop::sample::select(ConcentrationUnit::DETECTION_ORDER.to_vec())
}

/// How a standard of this unit is named on disk, e.g. `_mu_M`
fn file_suffix(unit: ConcentrationUnit) -> String {
    match unit {
        ConcentrationUnit::Molar => unit.marker().to_string(),
        _ => format!("{}M", unit.marker()),
    }
}

fn currents_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1e-6f64..1e-6, 0..200)
}

proptest! {
    /// Integer magnitudes with any marker scale by the unit factor
    #[test]
    fn test_label_scales_integer_magnitude(value in 0u32..100_000, unit in unit_strategy()) {
        let identifier = format!("{}{}", value, file_suffix(unit));
        let label = ConcentrationLabel::parse(&identifier);

        prop_assert_eq!(label.unit, Some(unit));
        prop_assert_eq!(&label.label, &format!("{}{}", value, unit.symbol()));
        let expected = f64::from(value) * unit.micromolar_factor();
        let micromolar = label.micromolar.unwrap();
        prop_assert!((micromolar - expected).abs() <= expected.abs() * 1e-12);
    }

    /// Identifiers without a unit marker pass through unchanged
    #[test]
    fn test_label_without_marker_passes_through(identifier in "[a-z0-9]{0,12}") {
        let label = ConcentrationLabel::parse(&identifier);
        prop_assert_eq!(label.unit, None);
        prop_assert_eq!(label.micromolar, None);
        prop_assert_eq!(label.label, identifier);
    }

    /// Every reported maximum is interior, ordered, and not below either neighbor
    #[test]
    fn test_local_maxima_are_ordered_interior_peaks(values in currents_strategy()) {
        let peaks = local_maxima(&values);

        for pair in peaks.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for &i in &peaks {
            prop_assert!(i > 0 && i + 1 < values.len());
            prop_assert!(values[i] >= values[i - 1]);
            prop_assert!(values[i] >= values[i + 1]);
        }
    }

    /// Filters only ever remove peaks
    #[test]
    fn test_filters_return_subset(
        values in currents_strategy(),
        height in -1e-6f64..1e-6,
        distance in 1usize..20,
    ) {
        let all = local_maxima(&values);
        let config = PeakFinderConfig::default()
            .with_min_height(height)
            .with_min_distance(distance);
        let filtered = PeakFinder::new(config).find_indices(&values);

        for i in &filtered {
            prop_assert!(all.contains(i));
            prop_assert!(values[*i] >= height);
        }
        for pair in filtered.windows(2) {
            prop_assert!(pair[1] - pair[0] >= distance);
        }
    }

    /// Points on an exact line give back that line
    #[test]
    fn test_fit_recovers_line(
        slope in -1e-6f64..1e-6,
        intercept in -1e-6f64..1e-6,
        xs in prop::collection::btree_set(0u32..1000, 2..20),
    ) {
        let points: Vec<(f64, f64)> = xs
            .into_iter()
            .map(|x| {
                let x = f64::from(x) / 10.0;
                (x, slope * x + intercept)
            })
            .collect();
        let fit = fit_linear(&points).unwrap();

        prop_assert!((fit.slope - slope).abs() <= 1e-12);
        prop_assert!((fit.intercept - intercept).abs() <= 1e-10);
        prop_assert!(fit.r.abs() <= 1.0);
    }

    /// Rows come out by ascending concentration with unlabelled samples last
    #[test]
    fn test_rows_sorted_by_concentration(
        names in prop::collection::vec(
            prop_oneof![
                (1u32..1000).prop_map(|v| format!("{}_mu_M", v)),
                (1u32..1000).prop_map(|v| format!("{}_n_M", v)),
                "[a-z]{3,8}",
            ],
            1..12,
        ),
    ) {
        let mut batch = Batch::new();
        for name in &names {
            batch.push(
                name.clone(),
                DataTable::new()
                    .with_column(Column::numeric(DEFAULT_POTENTIAL_COLUMN, vec![0.0, 0.1, 0.2]))
                    .with_column(Column::numeric(DEFAULT_CURRENT_COLUMN, vec![0.0, 1e-8, 0.0])),
            );
        }
        let result = AnalysisPipeline::default().run(batch);

        let concentrations: Vec<Option<f64>> =
            result.rows.iter().map(|row| row.micromolar()).collect();
        let first_undefined = concentrations
            .iter()
            .position(Option::is_none)
            .unwrap_or(concentrations.len());

        prop_assert!(concentrations[first_undefined..].iter().all(Option::is_none));
        for pair in concentrations[..first_undefined].windows(2) {
            prop_assert!(pair[0].unwrap() <= pair[1].unwrap());
        }
    }
}
