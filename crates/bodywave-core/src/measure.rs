//! The amplitude/period measurement pipeline.
//!
//! [`AmpPeriodMeasurer`] runs the stages in a fixed order and stops at the
//! first failure:
//!
//! ```text
//! filter check -> classify -> detrend check -> eliminate -> select pair
//!   -> neighbours -> refine (central fatal, sides optional)
//!   -> resolve half period -> filter correction -> result
//! ```
//!
//! A measurer holds nothing but its (already clamped) configuration, so one
//! instance can measure any number of windows, from any number of threads.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::classify::classify;
use crate::config::{MeasureConfig, ThresholdClamp};
use crate::eliminate::{eliminate, max_amplitude};
use crate::error::{MeasureError, RefineFailure};
use crate::filter_response::apply_filter_correction;
use crate::neighbors::find_neighbors;
use crate::period::{HalfPeriodResolver, half_period_candidates};
use crate::refine::{RefinedPosition, refine_quad};
use crate::select::select_max_pair;
use crate::window::SampleWindow;

/// A successful measurement.
///
/// `amplitude` and `period` are always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    /// Half peak-to-peak amplitude, corrected for the filter response.
    pub amplitude: f64,
    /// Period in seconds.
    pub period: f64,
    /// Absolute time in seconds of the larger central extremum.
    pub time_of_max: f64,
    /// Pass-band width in Hz of the filter the window went through.
    pub bandwidth: f64,
    /// Resolved half period in samples.
    pub half_period_samples: f64,
    /// Half-period readings combined into the result.
    pub readings_used: usize,
    /// Factor the raw amplitude was multiplied by.
    pub filter_correction: f64,
    /// Half peak-to-peak amplitude before filter correction.
    pub raw_amplitude: f64,
    /// Sub-sample window position of the larger central extremum.
    pub position_of_max: f64,
}

impl MeasurementResult {
    /// Dominant frequency in Hz.
    #[inline]
    pub fn frequency(&self) -> f64 {
        1.0 / self.period
    }
}

/// Measures amplitude and period of the dominant swing in a window.
#[derive(Debug, Clone)]
pub struct AmpPeriodMeasurer {
    config: MeasureConfig,
    clamps: Vec<ThresholdClamp>,
}

impl Default for AmpPeriodMeasurer {
    fn default() -> Self {
        Self::new(MeasureConfig::default())
    }
}

impl AmpPeriodMeasurer {
    /// Measurer using `config`, with out-of-range options clamped.
    pub fn new(config: MeasureConfig) -> Self {
        let (config, clamps) = config.clamped();
        Self { config, clamps }
    }

    /// The configuration in effect, after clamping.
    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// Options that were clamped at construction.
    pub fn clamps(&self) -> &[ThresholdClamp] {
        &self.clamps
    }

    /// Measure one window.
    pub fn measure(&self, window: &SampleWindow<'_>) -> Result<MeasurementResult, MeasureError> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "measure",
            len = window.len(),
            sample_rate = window.sample_rate(),
            start_time = window.start_time()
        )
        .entered();

        let result = self.run(window);

        #[cfg(feature = "tracing")]
        match &result {
            Ok(m) => tracing::debug!(
                amplitude = m.amplitude,
                period = m.period,
                time_of_max = m.time_of_max,
                "measurement done"
            ),
            Err(err) => tracing::debug!(error = %err, "measurement failed"),
        }

        result
    }

    fn run(&self, window: &SampleWindow<'_>) -> Result<MeasurementResult, MeasureError> {
        let cfg = &self.config;
        let t = &cfg.thresholds;
        let samples = window.samples();
        let sample_rate = window.sample_rate();

        cfg.filter.validate(sample_rate)?;

        let mut labels = classify(samples)?;

        let max_amp = max_amplitude(samples, &labels);
        let mean_percent = if max_amp > 0.0 {
            100.0 * window.mean().abs() / max_amp
        } else {
            f64::INFINITY
        };
        if mean_percent > t.threshold5 {
            return Err(MeasureError::SignalNotDetrended {
                mean_percent,
                limit: t.threshold5,
            });
        }

        let _elimination = eliminate(samples, &mut labels, t.threshold1);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            max_amp = _elimination.max_amp,
            rounds = _elimination.iterations,
            remaining = labels.extremum_count(),
            "elimination done"
        );

        let selection = select_max_pair(samples, &labels, t.threshold6)?;
        let quad = find_neighbors(samples, &labels, &selection.pair, t.threshold2);
        let refined = refine_quad(samples, &quad, cfg.refinement)?;

        let raw_amplitude = 0.5 * (refined.center_right.value - refined.center_left.value).abs();
        if raw_amplitude.is_nan() || raw_amplitude <= 0.0 {
            return Err(MeasureError::RefinementFailed {
                index: refined.center_left.index,
                reason: RefineFailure::DegenerateSwing,
            });
        }

        let candidates = half_period_candidates(&refined);
        let half_period =
            HalfPeriodResolver::new(cfg, window.len(), sample_rate).resolve(&candidates)?;
        let period = 2.0 * half_period.samples / sample_rate;

        let (amplitude, correction) = apply_filter_correction(
            &cfg.filter,
            1.0 / period,
            sample_rate,
            cfg.max_allowed_filter_correction,
            cfg.correction_overflow,
            raw_amplitude,
        )?;

        let max = larger_extremum(&refined.center_left, &refined.center_right);

        Ok(MeasurementResult {
            amplitude,
            period,
            time_of_max: window.time_at(max.position),
            bandwidth: cfg.filter.bandwidth(window.nyquist()),
            half_period_samples: half_period.samples,
            readings_used: half_period.readings_used,
            filter_correction: correction.factor,
            raw_amplitude,
            position_of_max: max.position,
        })
    }
}

/// Relative difference below which the two central extrema count as equal.
const TIE_TOLERANCE: f64 = 1e-9;

/// The central extremum with the larger magnitude; the earlier one on ties.
fn larger_extremum<'q>(left: &'q RefinedPosition, right: &'q RefinedPosition) -> &'q RefinedPosition {
    if right.value.abs() > left.value.abs() * (1.0 + TIE_TOLERANCE) {
        right
    } else {
        left
    }
}

/// Measure `window` with a one-off measurer built from `config`.
pub fn measure_amp_period(
    window: &SampleWindow<'_>,
    config: &MeasureConfig,
) -> Result<MeasurementResult, MeasureError> {
    AmpPeriodMeasurer::new(*config).measure(window)
}
