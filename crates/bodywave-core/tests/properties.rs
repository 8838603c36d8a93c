//! Property-based tests for the bodywave-core measurement kernel.
//!
//! Covers the classifier's edge rule, the elimination bound, determinism and
//! the positivity of every successful result, using proptest for randomized
//! traces.

use bodywave_core::{
    AmpPeriodMeasurer, ExtremumLabel, FilterSpec, MeasureConfig, SampleWindow, classify, eliminate,
};
use proptest::prelude::*;

const SAMPLE_RATE: f64 = 50.0;

fn trace() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0f64..=1.0f64, 5..300)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The first and last samples are never labelled, and labelled extrema
    /// alternate between peaks and troughs.
    #[test]
    fn classifier_skips_edges_and_alternates(samples in trace()) {
        if let Ok(labels) = classify(&samples) {
            let n = samples.len();
            prop_assert_eq!(labels.get(0), ExtremumLabel::Neither);
            prop_assert_eq!(labels.get(n - 1), ExtremumLabel::Neither);

            let positions = labels.positions();
            for w in positions.windows(2) {
                prop_assert_ne!(labels.get(w[0]), labels.get(w[1]));
            }
        }
    }

    /// Elimination runs at most `extrema / 2` rounds, removes two extrema per
    /// round and keeps the first and last surviving extremum.
    #[test]
    fn elimination_is_bounded_and_keeps_endpoints(
        samples in trace(),
        threshold1 in 0.0f64..=100.0f64,
    ) {
        if let Ok(mut labels) = classify(&samples) {
            let before = labels.positions();
            let summary = eliminate(&samples, &mut labels, threshold1);
            let after = labels.positions();

            prop_assert!(summary.iterations <= before.len() / 2);
            prop_assert_eq!(after.len(), before.len() - 2 * summary.iterations);
            prop_assert_eq!(after.first(), before.first());
            prop_assert_eq!(after.last(), before.last());
        }
    }

    /// The same window and configuration always give the same outcome.
    #[test]
    fn measurement_is_deterministic(samples in trace(), filtered in any::<bool>()) {
        let config = if filtered {
            MeasureConfig::default()
        } else {
            MeasureConfig { filter: FilterSpec::none(), ..MeasureConfig::default() }
        };
        let measurer = AmpPeriodMeasurer::new(config);
        let window = SampleWindow::from_slice(&samples, SAMPLE_RATE, 0.0).unwrap();

        let first = format!("{:?}", measurer.measure(&window));
        let second = format!("{:?}", measurer.measure(&window));
        prop_assert_eq!(first, second);
    }

    /// Any successful measurement has finite, strictly positive amplitude and
    /// period, and its maximum lies inside the window.
    #[test]
    fn success_is_strictly_positive(samples in trace(), filtered in any::<bool>()) {
        let config = if filtered {
            MeasureConfig::default()
        } else {
            MeasureConfig { filter: FilterSpec::none(), ..MeasureConfig::default() }
        };
        let window = SampleWindow::from_slice(&samples, SAMPLE_RATE, 10.0).unwrap();

        if let Ok(m) = AmpPeriodMeasurer::new(config).measure(&window) {
            prop_assert!(m.amplitude.is_finite() && m.amplitude > 0.0, "{:?}", m);
            prop_assert!(m.period.is_finite() && m.period > 0.0, "{:?}", m);
            prop_assert!(m.filter_correction >= 1.0 - 1e-9, "{:?}", m);
            prop_assert!((1..=3).contains(&m.readings_used));
            prop_assert!(m.position_of_max > 0.0);
            prop_assert!(m.position_of_max < (samples.len() - 1) as f64);
        }
    }

    /// A clean sinusoid is measured to within 1% in period and amplitude.
    #[test]
    fn sinusoid_recovered(
        freq in 0.5f64..4.0f64,
        amplitude in 0.01f64..100.0f64,
        phase in 0.0f64..core::f64::consts::TAU,
    ) {
        let samples: Vec<f64> = (0..400)
            .map(|k| amplitude * libm::sin(core::f64::consts::TAU * freq * k as f64 / SAMPLE_RATE + phase))
            .collect();
        let window = SampleWindow::from_slice(&samples, SAMPLE_RATE, 0.0).unwrap();
        let config = MeasureConfig { filter: FilterSpec::none(), ..MeasureConfig::default() };

        let m = AmpPeriodMeasurer::new(config).measure(&window).unwrap();
        prop_assert!((m.period * freq - 1.0).abs() < 0.01, "{:?}", m);
        prop_assert!((m.amplitude / amplitude - 1.0).abs() < 0.01, "{:?}", m);
    }
}
