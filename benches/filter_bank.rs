use baseflow_processor::calendar::{CalendarField, decompose_all};
use baseflow_processor::constants::{DEFAULT_HYDRUN_K, DEFAULT_HYDRUN_PASSES};
use baseflow_processor::filters::FilterSpec;
use baseflow_processor::quantile::broadcast_quantile;
use chrono::{Duration, NaiveDate};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

const N: usize = 100_000;

fn lcg_next(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

/// Recession curve with random storm pulses
fn synthetic_discharge(n: usize) -> Vec<f64> {
    let mut state = 0x0bad_cafe_u64;
    let mut storm = 0.0;
    (0..n)
        .map(|t| {
            if lcg_next(&mut state) % 37 == 0 {
                storm += 200.0 + (lcg_next(&mut state) % 400) as f64;
            }
            storm *= 0.7;
            40.0 + 20.0 * (t as f64 / 365.0).sin().abs() + storm
        })
        .collect()
}

fn benchmark_filters(c: &mut Criterion) {
    let discharge = synthetic_discharge(N);
    let bank = [
        FilterSpec::LyneHollick { alpha: 0.925 },
        FilterSpec::Chapman { alpha: 0.925 },
        FilterSpec::Eckhardt {
            alpha: 0.8,
            bfi_max: 0.6,
        },
        FilterSpec::ChapmanMaxwell { k: 0.7 },
        FilterSpec::Boughton { k: 0.925, c: 0.1 },
        FilterSpec::FureyGupta {
            gamma: 0.1,
            c1: 1.0,
            c3: 0.5,
        },
        FilterSpec::HydRun {
            k: DEFAULT_HYDRUN_K,
            passes: DEFAULT_HYDRUN_PASSES,
        },
    ];

    let mut group = c.benchmark_group("filter_bank");
    for filter in &bank {
        group.bench_function(format!("{}_n1e5", filter.name()), |b| {
            b.iter(|| {
                filter
                    .apply_to(black_box(&discharge), None)
                    .expect("filter should succeed")
            })
        });
    }
    group.finish();
}

fn benchmark_thresholds(c: &mut Criterion) {
    let discharge = synthetic_discharge(N);
    let first = NaiveDate::from_ymd_opt(1750, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid start date");
    let timestamps: Vec<_> = (0..N as i64).map(|i| first + Duration::days(i)).collect();
    let calendar = decompose_all(&timestamps);

    c.bench_function("month_quantile_n1e5", |b| {
        b.iter(|| {
            broadcast_quantile(
                black_box(&discharge),
                black_box(&calendar),
                CalendarField::Month,
                0.9,
            )
            .expect("quantile should succeed")
        })
    });
}

criterion_group!(benches, benchmark_filters, benchmark_thresholds);
criterion_main!(benches);
