//! Tests for the filter bank
//!
//! Shared hydrograph fixtures plus per-family suites.

pub mod bank_tests;
pub mod recursive_tests;

/// Storm hydrograph: slow recession with three sharp events
pub fn synthetic_hydrograph(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| {
            let base = 40.0 + 15.0 * (-(t as f64) / 200.0).exp();
            let storm = [30usize, 95, 160]
                .iter()
                .filter(|&&peak| t >= peak)
                .map(|&peak| 250.0 * (-((t - peak) as f64) / 4.0).exp())
                .sum::<f64>();
            base + storm
        })
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected}, got {actual} (tolerance {tolerance})"
    );
}
