//! Run these benches with `cargo bench --bench parcel -- --verbose`

use criterion::{criterion_group, criterion_main, Criterion};

mod utils;

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(parcel_benches);

criterion_group!(
    name = parcel_benches;
    config = build_tester();
    targets = mixed_layer_parcel_bench, most_unstable_parcel_bench, lift_parcel_bench,
              parcel_trajectory_bench
);

fn mixed_layer_parcel_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_soundings();

    c.bench_function("mixed_layer_parcel", |b| {
        b.iter(|| {
            for snd in &snds {
                let _x = wx_viewer::mixed_layer_parcel(snd).expect("oops");
            }
        });
    });
}

// No bench for surface_parcel, it only copies the bottom row.

fn most_unstable_parcel_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_soundings();

    c.bench_function("most_unstable_parcel", |b| {
        b.iter(|| {
            for snd in &snds {
                let _x = wx_viewer::most_unstable_parcel(snd).expect("oops");
            }
        });
    });
}

fn lift_parcel_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_soundings();
    let pcls: Vec<_> = snds
        .iter()
        .map(|snd| wx_viewer::surface_parcel(snd).expect("oops"))
        .collect();

    c.bench_function("lift_parcel", |b| {
        b.iter(|| {
            for (snd, pcl) in snds.iter().zip(&pcls) {
                let _x = wx_viewer::lift_parcel(*pcl, snd).expect("oops");
            }
        });
    });
}

fn parcel_trajectory_bench(c: &mut Criterion) {
    let snds = utils::load_all_test_soundings();
    let pcls: Vec<_> = snds
        .iter()
        .map(|snd| wx_viewer::surface_parcel(snd).expect("oops"))
        .collect();

    c.bench_function("parcel_trajectory", |b| {
        b.iter(|| {
            for (snd, pcl) in snds.iter().zip(&pcls) {
                let _x = wx_viewer::parcel_trajectory(pcl, snd).expect("oops");
            }
        });
    });
}
