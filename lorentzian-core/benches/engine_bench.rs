//! Criterion benchmarks for the per-bar hot path.
//!
//! Benchmarks:
//! 1. Full engine over a synthetic series (features + classifier + filters + kernel)
//! 2. Classifier scan against a full history
//! 3. Kernel regression update

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lorentzian_core::classifier::LorentzianClassifier;
use lorentzian_core::config::KernelConfig;
use lorentzian_core::domain::Direction;
use lorentzian_core::features::{FeatureArrays, FeatureVector, LabelHistory};
use lorentzian_core::kernel::KernelEstimator;
use lorentzian_core::synthetic;
use lorentzian_core::{Engine, LorentzianConfig, PositionState};

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    for &max_bars_back in &[500usize, 2000] {
        let bars = synthetic::for_symbol("SPY", max_bars_back + 1000);
        let config = LorentzianConfig {
            max_bars_back,
            ..LorentzianConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new("process_bar", max_bars_back),
            &bars,
            |b, bars| {
                b.iter(|| {
                    let mut engine = Engine::new(config.clone()).unwrap();
                    for bar in bars {
                        black_box(engine.process_bar(bar, PositionState::Flat).unwrap());
                    }
                })
            },
        );
    }
    group.finish();
}

fn bench_classifier(c: &mut Criterion) {
    let mut arrays = FeatureArrays::new(5, 2000);
    let mut labels = LabelHistory::new(2000);
    for i in 0..2000 {
        let x = i as f64;
        arrays.push(&FeatureVector::new(vec![
            (x * 0.013).sin().abs(),
            (x * 0.029).cos().abs(),
            (x * 0.007).sin().abs(),
            (x * 0.041).cos().abs(),
            (x * 0.019).sin().abs(),
        ]));
        labels.push(Direction::from_change((x * 0.05).sin()));
    }
    let current = FeatureVector::new(vec![0.4, 0.6, 0.5, 0.3, 0.7]);
    let clf = LorentzianClassifier::new(8, 2000);

    c.bench_function("classifier_predict_2000", |b| {
        b.iter(|| black_box(clf.predict(black_box(&current), &arrays, &labels)))
    });
}

fn bench_kernel(c: &mut Criterion) {
    let closes: Vec<f64> = synthetic::for_symbol("QQQ", 5000)
        .iter()
        .map(|b| b.close)
        .collect();
    c.bench_function("kernel_update_5000", |b| {
        b.iter(|| {
            let mut kernel = KernelEstimator::new(KernelConfig::default());
            for &close in &closes {
                black_box(kernel.update(close));
            }
        })
    });
}

criterion_group!(benches, bench_engine, bench_classifier, bench_kernel);
criterion_main!(benches);
