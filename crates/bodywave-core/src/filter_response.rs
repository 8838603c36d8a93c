//! Inverse Butterworth response correction.
//!
//! The measured amplitude comes from a band-limited trace. To report ground
//! amplitude at the measured frequency the kernel divides by the magnitude
//! response of the Butterworth filter that produced the trace.
//!
//! Frequencies are pre-warped for the bilinear transform,
//! `f' = tan(π f Δt) / (π Δt)`, then mapped onto the low-pass prototype:
//!
//! | band | prototype frequency ω |
//! |------|-----------------------|
//! | band-pass | `(f² - f_lo f_hi) / (f (f_hi - f_lo))` |
//! | high-pass | `-f_lo / f` |
//! | low-pass | `f / f_hi` |
//!
//! with `|H| = sqrt(1 / (1 + |ω|^(2n)))`, squared for a zero-phase
//! (forward-backward) filter.

use core::f64::consts::PI;
use libm::{pow, sqrt, tan};

use crate::error::{InputError, MeasureError};

/// Highest Butterworth order the corrector accepts.
pub const MAX_FILTER_ORDER: u32 = 10;

/// Butterworth filter that was applied to the trace.
///
/// A corner of `0.0` means that side of the band is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSpec {
    /// Butterworth order (poles per side); 0 means unfiltered.
    pub order: u32,
    /// Filter was run forward and backward.
    pub zero_phase: bool,
    /// High-pass corner in Hz, 0 if unset.
    pub low_cut_hz: f64,
    /// Low-pass corner in Hz, 0 if unset.
    pub high_cut_hz: f64,
}

impl Default for FilterSpec {
    /// Third-order causal 0.8-4.5 Hz band-pass, the usual short-period band.
    fn default() -> Self {
        Self::bandpass(3, 0.8, 4.5)
    }
}

/// Which corners of a [`FilterSpec`] are active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// No corners set.
    Open,
    /// Only the high corner is set.
    Lowpass {
        /// Corner in Hz.
        high_hz: f64,
    },
    /// Only the low corner is set.
    Highpass {
        /// Corner in Hz.
        low_hz: f64,
    },
    /// Both corners are set.
    Bandpass {
        /// Low corner in Hz.
        low_hz: f64,
        /// High corner in Hz.
        high_hz: f64,
    },
}

impl FilterSpec {
    /// No filtering: corrections are always 1.
    pub const fn none() -> Self {
        Self {
            order: 0,
            zero_phase: false,
            low_cut_hz: 0.0,
            high_cut_hz: 0.0,
        }
    }

    /// Causal band-pass.
    pub const fn bandpass(order: u32, low_cut_hz: f64, high_cut_hz: f64) -> Self {
        Self {
            order,
            zero_phase: false,
            low_cut_hz,
            high_cut_hz,
        }
    }

    /// Causal low-pass.
    pub const fn lowpass(order: u32, high_cut_hz: f64) -> Self {
        Self::bandpass(order, 0.0, high_cut_hz)
    }

    /// Causal high-pass.
    pub const fn highpass(order: u32, low_cut_hz: f64) -> Self {
        Self::bandpass(order, low_cut_hz, 0.0)
    }

    /// Same filter, run zero-phase or not.
    pub const fn with_zero_phase(mut self, zero_phase: bool) -> Self {
        self.zero_phase = zero_phase;
        self
    }

    /// Active corners.
    pub fn band(&self) -> Band {
        match (self.low_cut_hz > 0.0, self.high_cut_hz > 0.0) {
            (false, false) => Band::Open,
            (false, true) => Band::Lowpass {
                high_hz: self.high_cut_hz,
            },
            (true, false) => Band::Highpass {
                low_hz: self.low_cut_hz,
            },
            (true, true) => Band::Bandpass {
                low_hz: self.low_cut_hz,
                high_hz: self.high_cut_hz,
            },
        }
    }

    /// True if the filter changes the signal at all.
    pub fn is_active(&self) -> bool {
        self.order > 0 && self.band() != Band::Open
    }

    /// Pass-band width in Hz for data with the given Nyquist frequency.
    pub fn bandwidth(&self, nyquist_hz: f64) -> f64 {
        if self.order == 0 {
            return nyquist_hz;
        }
        match self.band() {
            Band::Open => nyquist_hz,
            Band::Lowpass { high_hz } => high_hz,
            Band::Highpass { low_hz } => nyquist_hz - low_hz,
            Band::Bandpass { low_hz, high_hz } => high_hz - low_hz,
        }
    }

    /// Check order and corners against the data's sample rate.
    pub fn validate(&self, sample_rate: f64) -> Result<(), InputError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(InputError::InvalidSampleRate(sample_rate));
        }
        if self.order > MAX_FILTER_ORDER {
            return Err(InputError::InvalidFilterOrder(self.order));
        }
        let nyquist_hz = 0.5 * sample_rate;
        for (name, freq_hz) in [("low_cut", self.low_cut_hz), ("high_cut", self.high_cut_hz)] {
            if !freq_hz.is_finite() || freq_hz < 0.0 || freq_hz >= nyquist_hz {
                return Err(InputError::InvalidCutoff {
                    name,
                    freq_hz,
                    nyquist_hz,
                });
            }
        }
        if let Band::Bandpass { low_hz, high_hz } = self.band()
            && low_hz >= high_hz
        {
            return Err(InputError::InvertedBand {
                low_cut_hz: low_hz,
                high_cut_hz: high_hz,
            });
        }
        Ok(())
    }
}

/// What to do when the required correction reaches the allowed maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionOverflow {
    /// Refuse the correction.
    #[default]
    Reject,
    /// Use the maximum allowed correction instead. Diagnostic use only.
    Clamp,
}

/// A computed correction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCorrection {
    /// Filter magnitude response `|H|` at the target frequency.
    pub gain: f64,
    /// Factor the amplitude is multiplied by.
    pub factor: f64,
    /// The factor was limited by [`CorrectionOverflow::Clamp`].
    pub clamped: bool,
}

impl FilterCorrection {
    /// No correction.
    pub const IDENTITY: Self = Self {
        gain: 1.0,
        factor: 1.0,
        clamped: false,
    };

    /// Apply to an amplitude.
    #[inline]
    pub fn apply(&self, amplitude: f64) -> f64 {
        amplitude * self.factor
    }
}

#[inline]
fn prewarp(freq_hz: f64, dt: f64) -> f64 {
    tan(PI * freq_hz * dt) / (PI * dt)
}

/// Filter magnitude response at `freq_hz`.
pub fn butterworth_gain(
    filter: &FilterSpec,
    freq_hz: f64,
    sample_rate: f64,
) -> Result<f64, MeasureError> {
    filter.validate(sample_rate)?;
    let nyquist_hz = 0.5 * sample_rate;
    if !freq_hz.is_finite() || freq_hz <= 0.0 || freq_hz >= nyquist_hz {
        return Err(InputError::InvalidFrequency {
            freq_hz,
            nyquist_hz,
        }
        .into());
    }
    if filter.order == 0 {
        return Ok(1.0);
    }

    let dt = 1.0 / sample_rate;
    let f = prewarp(freq_hz, dt);
    let omega = match filter.band() {
        Band::Open => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                order = filter.order,
                "filter order set without corners, amplitude not corrected"
            );
            return Ok(1.0);
        }
        Band::Bandpass { low_hz, high_hz } => {
            let (lo, hi) = (prewarp(low_hz, dt), prewarp(high_hz, dt));
            (f * f - lo * hi) / (f * (hi - lo))
        }
        Band::Highpass { low_hz } => -prewarp(low_hz, dt) / f,
        Band::Lowpass { high_hz } => f / prewarp(high_hz, dt),
    };

    let gain = sqrt(1.0 / (1.0 + pow(omega.abs(), 2.0 * f64::from(filter.order))));
    Ok(if filter.zero_phase { gain * gain } else { gain })
}

/// Correction factor `1 / |H|` at `freq_hz`, limited by `max_allowed`.
pub fn correction_factor(
    filter: &FilterSpec,
    freq_hz: f64,
    sample_rate: f64,
    max_allowed: f64,
    overflow: CorrectionOverflow,
) -> Result<FilterCorrection, MeasureError> {
    let gain = butterworth_gain(filter, freq_hz, sample_rate)?;
    let factor = if gain > 0.0 { 1.0 / gain } else { f64::INFINITY };
    if factor < max_allowed {
        return Ok(FilterCorrection {
            gain,
            factor,
            clamped: false,
        });
    }
    match overflow {
        CorrectionOverflow::Reject => Err(MeasureError::FilterCorrectionTooHigh {
            correction: factor,
            limit: max_allowed,
        }),
        CorrectionOverflow::Clamp => {
            #[cfg(feature = "tracing")]
            tracing::warn!(factor, max_allowed, "filter correction clamped");
            Ok(FilterCorrection {
                gain,
                factor: max_allowed,
                clamped: true,
            })
        }
    }
}

/// Correct `amplitude` for the filter response at `freq_hz`.
pub fn apply_filter_correction(
    filter: &FilterSpec,
    freq_hz: f64,
    sample_rate: f64,
    max_allowed: f64,
    overflow: CorrectionOverflow,
    amplitude: f64,
) -> Result<(f64, FilterCorrection), MeasureError> {
    let correction = correction_factor(filter, freq_hz, sample_rate, max_allowed, overflow)?;
    Ok((correction.apply(amplitude), correction))
}
