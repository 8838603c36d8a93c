//! Measurement configuration.
//!
//! All tunables of the kernel live in [`MeasureConfig`]. Out-of-range values
//! are never fatal: [`MeasureConfig::clamped`] pulls each one to its nearest
//! documented bound and reports what changed.
//!
//! | option | default | bounds | meaning |
//! |--------|---------|--------|---------|
//! | `threshold1` | 10 | 0..=100 | % of window range below which an extrema pair is eliminated |
//! | `threshold2` | 30 | 0..=100 | % of pair swing a neighbour must reach |
//! | `threshold3` | 80 | 1..=100 | % of Nyquist a reading's frequency may reach |
//! | `threshold4` | 1.5 | 1..=10 | max ratio between agreeing readings |
//! | `threshold5` | 10 | 0..=100 | max % of window range the mean may reach |
//! | `threshold6` | 90 | 0..=100 | % of max swing an earlier pair needs to win |
//! | `allowed_hp_ratio` | 1.25 | 1..=10 | reading may lie this factor above the high corner |
//! | `allowed_lp_ratio` | 1.25 | 1..=10 | reading may lie this factor below the low corner |
//! | `max_allowed_filter_correction` | 5 | 1..=1000 | largest accepted `1/|H|` |
//! | `taper_fraction` | 0.05 | 0..=0.5 | cosine taper applied by the filter stage |
//! | `lead_seconds` | 0.5 | >= 0 | window start before the arrival |
//! | `length_seconds` | 5 | >= 0 | window length |
//! | `filter_margin_seconds` | 10 | >= 0 | extra data the filter stage needs on each side |

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::filter_response::{CorrectionOverflow, FilterSpec};
use crate::period::ReadingPolicy;
use crate::refine::RefinementMode;

/// The six numbered thresholds of the measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Elimination threshold, % of the window's peak-to-trough range.
    pub threshold1: f64,
    /// Neighbour significance, % of the central pair's swing.
    pub threshold2: f64,
    /// Nyquist proximity, % of the Nyquist frequency.
    pub threshold3: f64,
    /// Agreement ratio between half-period readings.
    pub threshold4: f64,
    /// Detrend limit, % of the window's peak-to-trough range.
    pub threshold5: f64,
    /// Early-pair preference, % of the largest swing.
    pub threshold6: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            threshold1: 10.0,
            threshold2: 30.0,
            threshold3: 80.0,
            threshold4: 1.5,
            threshold5: 10.0,
            threshold6: 90.0,
        }
    }
}

/// A configuration value that was pulled back into range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClamp {
    /// Option name as documented.
    pub name: &'static str,
    /// Value supplied by the caller.
    pub value: f64,
    /// Value actually used.
    pub clamped_to: f64,
}

/// Complete configuration of one measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureConfig {
    /// Filter the window was passed through.
    pub filter: FilterSpec,
    /// Cosine taper fraction used by the filter stage.
    pub taper_fraction: f64,
    /// Numbered thresholds.
    pub thresholds: Thresholds,
    /// Allowed factor above the high corner.
    pub allowed_hp_ratio: f64,
    /// Allowed factor below the low corner.
    pub allowed_lp_ratio: f64,
    /// Largest accepted filter correction factor.
    pub max_allowed_filter_correction: f64,
    /// Window start, seconds before the arrival.
    pub lead_seconds: f64,
    /// Window length in seconds.
    pub length_seconds: f64,
    /// Data the filter stage needs beyond each end of the window.
    pub filter_margin_seconds: f64,
    /// Sub-sample fit selection.
    pub refinement: RefinementMode,
    /// Reading combination policy.
    pub readings: ReadingPolicy,
    /// Behaviour when the correction exceeds its limit.
    pub correction_overflow: CorrectionOverflow,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            filter: FilterSpec::default(),
            taper_fraction: 0.05,
            thresholds: Thresholds::default(),
            allowed_hp_ratio: 1.25,
            allowed_lp_ratio: 1.25,
            max_allowed_filter_correction: 5.0,
            lead_seconds: 0.5,
            length_seconds: 5.0,
            filter_margin_seconds: 10.0,
            refinement: RefinementMode::default(),
            readings: ReadingPolicy::default(),
            correction_overflow: CorrectionOverflow::default(),
        }
    }
}

fn clamp_into(
    name: &'static str,
    value: &mut f64,
    min: f64,
    max: f64,
    fallback: f64,
    clamps: &mut Vec<ThresholdClamp>,
) {
    let original = *value;
    let clamped = if original.is_nan() {
        fallback
    } else {
        original.clamp(min, max)
    };
    if clamped != original || original.is_nan() {
        #[cfg(feature = "tracing")]
        tracing::warn!(option = name, value = original, clamped, "option out of range, clamped");
        clamps.push(ThresholdClamp {
            name,
            value: original,
            clamped_to: clamped,
        });
        *value = clamped;
    }
}

impl MeasureConfig {
    /// Copy with every option inside its documented bounds, plus the list of
    /// options that had to be changed.
    pub fn clamped(&self) -> (Self, Vec<ThresholdClamp>) {
        let defaults = Self::default();
        let mut out = *self;
        let mut clamps = Vec::new();

        let t = &mut out.thresholds;
        let d = &defaults.thresholds;
        clamp_into("threshold1", &mut t.threshold1, 0.0, 100.0, d.threshold1, &mut clamps);
        clamp_into("threshold2", &mut t.threshold2, 0.0, 100.0, d.threshold2, &mut clamps);
        clamp_into("threshold3", &mut t.threshold3, 1.0, 100.0, d.threshold3, &mut clamps);
        clamp_into("threshold4", &mut t.threshold4, 1.0, 10.0, d.threshold4, &mut clamps);
        clamp_into("threshold5", &mut t.threshold5, 0.0, 100.0, d.threshold5, &mut clamps);
        clamp_into("threshold6", &mut t.threshold6, 0.0, 100.0, d.threshold6, &mut clamps);

        clamp_into(
            "allowed_hp_ratio",
            &mut out.allowed_hp_ratio,
            1.0,
            10.0,
            defaults.allowed_hp_ratio,
            &mut clamps,
        );
        clamp_into(
            "allowed_lp_ratio",
            &mut out.allowed_lp_ratio,
            1.0,
            10.0,
            defaults.allowed_lp_ratio,
            &mut clamps,
        );
        clamp_into(
            "max_allowed_filter_correction",
            &mut out.max_allowed_filter_correction,
            1.0,
            1000.0,
            defaults.max_allowed_filter_correction,
            &mut clamps,
        );
        clamp_into(
            "taper_fraction",
            &mut out.taper_fraction,
            0.0,
            0.5,
            defaults.taper_fraction,
            &mut clamps,
        );
        clamp_into(
            "lead_seconds",
            &mut out.lead_seconds,
            0.0,
            f64::MAX,
            defaults.lead_seconds,
            &mut clamps,
        );
        clamp_into(
            "length_seconds",
            &mut out.length_seconds,
            0.0,
            f64::MAX,
            defaults.length_seconds,
            &mut clamps,
        );
        clamp_into(
            "filter_margin_seconds",
            &mut out.filter_margin_seconds,
            0.0,
            f64::MAX,
            defaults.filter_margin_seconds,
            &mut clamps,
        );

        (out, clamps)
    }

    /// `[start, end)` in absolute seconds of the measurement window for an
    /// arrival at `arrival_time`.
    pub fn window_span(&self, arrival_time: f64) -> (f64, f64) {
        let start = arrival_time - self.lead_seconds;
        (start, start + self.length_seconds)
    }

    /// `[start, end)` of the data the filter stage needs to produce the window.
    pub fn required_data_span(&self, arrival_time: f64) -> (f64, f64) {
        let (start, end) = self.window_span(arrival_time);
        (
            start - self.filter_margin_seconds,
            end + self.filter_margin_seconds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_clamping() {
        let (cfg, clamps) = MeasureConfig::default().clamped();
        assert!(clamps.is_empty());
        assert_eq!(cfg, MeasureConfig::default());
    }

    #[test]
    fn negative_threshold1_clamps_to_zero() {
        let mut cfg = MeasureConfig::default();
        cfg.thresholds.threshold1 = -5.0;
        let (out, clamps) = cfg.clamped();
        assert_eq!(out.thresholds.threshold1, 0.0);
        assert_eq!(
            clamps,
            vec![ThresholdClamp {
                name: "threshold1",
                value: -5.0,
                clamped_to: 0.0
            }]
        );
    }

    #[test]
    fn upper_bounds_and_nan() {
        let mut cfg = MeasureConfig::default();
        cfg.thresholds.threshold6 = 250.0;
        cfg.thresholds.threshold4 = f64::NAN;
        cfg.taper_fraction = 0.9;
        let (out, clamps) = cfg.clamped();
        assert_eq!(out.thresholds.threshold6, 100.0);
        assert_eq!(out.thresholds.threshold4, 1.5);
        assert_eq!(out.taper_fraction, 0.5);
        assert_eq!(clamps.len(), 3);
    }

    #[test]
    fn spans_include_margin() {
        let cfg = MeasureConfig::default();
        assert_eq!(cfg.window_span(100.0), (99.5, 104.5));
        assert_eq!(cfg.required_data_span(100.0), (89.5, 114.5));
    }
}
