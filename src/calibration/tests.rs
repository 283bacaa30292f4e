use super::*;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_exact_line() {
    let fit = fit_linear(&[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)]).unwrap();
    assert_close(fit.slope, 2.0);
    assert_close(fit.intercept, 0.0);
    assert_close(fit.r_squared(), 1.0);
    assert_eq!(fit.points, 3);
    assert_close(fit.slope_stderr.unwrap(), 0.0);
}

#[test]
fn test_noisy_line() {
    let points = [(0.0, 1.0), (1.0, 3.1), (2.0, 4.9), (3.0, 7.2), (4.0, 8.8)];
    let fit = fit_linear(&points).unwrap();
    assert_close(fit.slope, 1.97);
    assert_close(fit.intercept, 1.06);
    assert!(fit.r > 0.99 && fit.r <= 1.0);
    assert!(fit.slope_stderr.unwrap() > 0.0);
    assert!(fit.intercept_stderr.unwrap() > fit.slope_stderr.unwrap());
}

#[test]
fn test_negative_correlation() {
    let fit = fit_linear(&[(1.0, 3.0), (2.0, 2.0), (3.0, 1.0)]).unwrap();
    assert_close(fit.slope, -1.0);
    assert_close(fit.r, -1.0);
    assert_close(fit.r_squared(), 1.0);
}

#[test]
fn test_single_point_is_rejected() {
    assert_eq!(
        fit_linear(&[(1.0, 2.0)]).unwrap_err(),
        FitError::InsufficientData { points: 1 }
    );
    assert_eq!(
        fit_linear(&[]).unwrap_err(),
        FitError::InsufficientData { points: 0 }
    );
}

#[test]
fn test_two_points_have_no_stderr() {
    let fit = fit_linear(&[(1.0, 1.0), (3.0, 5.0)]).unwrap();
    assert_close(fit.slope, 2.0);
    assert_close(fit.intercept, -1.0);
    assert_eq!(fit.slope_stderr, None);
    assert_eq!(fit.intercept_stderr, None);
}

#[test]
fn test_identical_concentrations_are_rejected() {
    let err = fit_linear(&[(5.0, 1.0), (5.0, 2.0)]).unwrap_err();
    assert_eq!(err, FitError::DegenerateConcentration { value: 5.0 });
}

#[test]
fn test_flat_current_has_zero_correlation() {
    let fit = fit_linear(&[(1.0, 2.0), (2.0, 2.0), (3.0, 2.0)]).unwrap();
    assert_close(fit.slope, 0.0);
    assert_close(fit.r, 0.0);
    assert_eq!(fit.invert(2.0), None);
}

#[test]
fn test_predict_and_invert() {
    let fit = fit_linear(&[(0.0, 1e-7), (10.0, 3e-7)]).unwrap();
    assert!((fit.predict(5.0) - 2e-7).abs() < 1e-18);
    assert!((fit.invert(2e-7).unwrap() - 5.0).abs() < 1e-9);
}

#[test]
fn test_equation_string() {
    let calibration =
        CalibrationResult::fit(Channel::Primary, "HQ", &[(1.0, 2.0), (2.0, 4.0), (3.0, 6.0)])
            .unwrap();
    assert_eq!(calibration.equation(), "Current(A) = 2[HQ] + 0, R² = 1.000");

    let calibration = CalibrationResult::fit(
        Channel::Secondary,
        "CC",
        &[(1.0, 2.5e-8), (2.0, 4.8e-8), (4.0, 9.9e-8)],
    )
    .unwrap();
    let equation = calibration.equation();
    assert!(equation.starts_with("Current(A) = 2.5e-08[CC] + "));
    assert!(equation.ends_with(&format!("R² = {:.3}", calibration.r_squared())));
}
