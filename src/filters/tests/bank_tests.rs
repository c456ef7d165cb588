//! Tests for filter selection through `FilterSpec`

use super::synthetic_hydrograph;
use crate::error::BaseflowError;
use crate::filters::FilterSpec;
use serde::Deserialize;

fn full_bank() -> Vec<FilterSpec> {
    vec![
        FilterSpec::LyneHollick { alpha: 0.925 },
        FilterSpec::Chapman { alpha: 0.925 },
        FilterSpec::Eckhardt {
            alpha: 0.98,
            bfi_max: 0.8,
        },
        FilterSpec::ChapmanMaxwell { k: 0.7 },
        FilterSpec::Boughton { k: 0.95, c: 0.05 },
        FilterSpec::FureyGupta {
            gamma: 0.1,
            c1: 1.0,
            c3: 0.3,
        },
        FilterSpec::Tr55 {
            curve_number: 75.0,
            initial_abstraction: None,
        },
        FilterSpec::HydRun { k: 0.925, passes: 1 },
    ]
}

#[test]
fn test_every_filter_seeds_with_first_discharge() {
    let q = synthetic_hydrograph(200);
    let p: Vec<f64> = (0..q.len()).map(|t| if t % 17 == 0 { 2.0 } else { 0.0 }).collect();

    for spec in full_bank() {
        let b = spec.apply_to(&q, Some(&p)).unwrap();
        assert_eq!(b.len(), q.len(), "{} length", spec.name());
        assert_eq!(b.values()[0], q[0], "{} seed", spec.name());
    }
}

#[test]
fn test_filters_are_deterministic() {
    let q = synthetic_hydrograph(200);
    let p = vec![0.5; q.len()];

    for spec in full_bank() {
        let first = spec.apply_to(&q, Some(&p)).unwrap();
        let second = spec.apply_to(&q, Some(&p)).unwrap();
        assert_eq!(first, second, "{} is not deterministic", spec.name());
    }
}

#[test]
fn test_chapman_maxwell_carries_quickflow() {
    let q = synthetic_hydrograph(100);
    let spec = FilterSpec::ChapmanMaxwell { k: 0.7 };
    let b = spec.apply_to(&q, None).unwrap();

    let quick = b.quickflow().expect("Chapman-Maxwell must report quickflow");
    assert_eq!(quick.len(), q.len());
    assert!(quick.iter().all(|&v| v >= 0.0));
    assert_eq!(
        spec.output_columns(),
        vec!["Chapman_Maxwell".to_string(), "Chapman_Maxwell_Quickflow".to_string()]
    );
}

#[test]
fn test_other_filters_have_no_quickflow() {
    let q = synthetic_hydrograph(50);
    let b = FilterSpec::Eckhardt {
        alpha: 0.8,
        bfi_max: 0.6,
    }
    .apply_to(&q, None)
    .unwrap();
    assert!(b.quickflow().is_none());
}

#[test]
fn test_tr55_without_precipitation_is_insufficient_data() {
    let spec = FilterSpec::Tr55 {
        curve_number: 70.0,
        initial_abstraction: None,
    };
    assert!(spec.requires_precipitation());
    let result = spec.apply_to(&[1.0, 2.0], None);
    assert!(matches!(result, Err(BaseflowError::InsufficientData { .. })));
}

#[test]
fn test_invalid_filter_produces_no_output() {
    let spec = FilterSpec::LyneHollick { alpha: 1.5 };
    assert!(spec.validate().is_err());
    assert!(matches!(
        spec.apply_to(&[10.0, 8.0, 6.0], None),
        Err(BaseflowError::InvalidParameter { .. })
    ));
}

#[test]
fn test_reference_bank_is_valid() {
    let bank = FilterSpec::reference_bank();
    let names: Vec<_> = bank.iter().map(FilterSpec::name).collect();
    assert_eq!(names, vec!["Lyne_Hollick", "Chapman", "Eckhardt", "Chapman_Maxwell"]);
    assert!(bank.iter().all(|spec| spec.validate().is_ok()));
}

#[derive(Deserialize)]
struct Bank {
    filters: Vec<FilterSpec>,
}

#[test]
fn test_specs_deserialize_from_toml() {
    let text = r#"
        [[filters]]
        algorithm = "eckhardt"
        alpha = 0.8
        bfi_max = 0.6

        [[filters]]
        algorithm = "hydrun"
        k = 0.925
        passes = 3

        [[filters]]
        algorithm = "tr55"
        curve_number = 80.0
    "#;

    let bank: Bank = toml::from_str(text).unwrap();
    assert_eq!(
        bank.filters,
        vec![
            FilterSpec::Eckhardt {
                alpha: 0.8,
                bfi_max: 0.6
            },
            FilterSpec::HydRun { k: 0.925, passes: 3 },
            FilterSpec::Tr55 {
                curve_number: 80.0,
                initial_abstraction: None
            },
        ]
    );
}
