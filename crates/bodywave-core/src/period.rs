//! Half-period resolution.
//!
//! Up to three half-period readings come out of the refined extrema: the
//! central pair (always), and the backward and forward neighbours when they
//! survived. Each reading is validated on its own; the survivors are then
//! combined according to how many there are and how well they agree.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::fmt;
use libm::pow;

use crate::config::MeasureConfig;
use crate::error::{InputError, MeasureError};
use crate::filter_response::{CorrectionOverflow, correction_factor};
use crate::refine::RefinedQuad;

/// How surviving readings are averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    /// Arithmetic mean.
    #[default]
    ArithmeticMean,
    /// Geometric mean.
    GeometricMean,
}

/// Policy for turning validated readings into one half period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadingPolicy {
    /// Refuse a result backed by a single reading.
    pub require_multiple: bool,
    /// Averaging used for agreeing readings.
    pub combine: Combine,
}

/// Where a reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateSource {
    /// Backward neighbour to the earlier pair extremum.
    Backward,
    /// Between the two pair extrema.
    Center,
    /// Later pair extremum to the forward neighbour.
    Forward,
}

/// One half-period reading in samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPeriodCandidate {
    /// Which extrema span the reading.
    pub source: CandidateSource,
    /// Half period in samples.
    pub samples: f64,
}

/// Why a reading was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    /// Too close to the Nyquist frequency.
    NearNyquist,
    /// Too long for the window to hold several cycles.
    TooLongForWindow,
    /// Frequency too far above the high corner.
    AboveHighCut,
    /// Frequency too far below the low corner.
    BelowLowCut,
    /// Filter correction at this frequency is at or over the limit.
    CorrectionTooHigh {
        /// Correction the reading would need.
        factor: f64,
    },
    /// The filter cannot be evaluated at this sample rate.
    InvalidFilter,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::NearNyquist => "too close to nyquist",
            Self::TooLongForWindow => "too long for window",
            Self::AboveHighCut => "above high cut",
            Self::BelowLowCut => "below low cut",
            Self::CorrectionTooHigh { .. } => "filter correction too high",
            Self::InvalidFilter => "invalid filter",
        };
        f.write_str(reason)
    }
}

/// The resolved half period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPeriod {
    /// Best half period in samples.
    pub samples: f64,
    /// Readings that went into it.
    pub readings_used: usize,
}

/// Collect the half-period readings spanned by a refined quad.
pub fn half_period_candidates(quad: &RefinedQuad) -> Vec<HalfPeriodCandidate> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(back) = quad.backward {
        candidates.push(HalfPeriodCandidate {
            source: CandidateSource::Backward,
            samples: quad.center_left.position - back.position,
        });
    }
    candidates.push(HalfPeriodCandidate {
        source: CandidateSource::Center,
        samples: quad.center_right.position - quad.center_left.position,
    });
    if let Some(fwd) = quad.forward {
        candidates.push(HalfPeriodCandidate {
            source: CandidateSource::Forward,
            samples: fwd.position - quad.center_right.position,
        });
    }
    candidates
}

/// Validates and combines half-period readings for one window.
#[derive(Debug, Clone, Copy)]
pub struct HalfPeriodResolver<'a> {
    config: &'a MeasureConfig,
    window_len: usize,
    sample_rate: f64,
}

impl<'a> HalfPeriodResolver<'a> {
    /// Resolver for a window of `window_len` samples at `sample_rate`.
    pub fn new(config: &'a MeasureConfig, window_len: usize, sample_rate: f64) -> Self {
        Self {
            config,
            window_len,
            sample_rate,
        }
    }

    /// Frequency in Hz of a half period given in samples.
    #[inline]
    pub fn frequency_of(&self, half_period: f64) -> f64 {
        self.sample_rate / (2.0 * half_period)
    }

    /// Check one reading against the Nyquist, window, band and correction limits.
    pub fn validate(&self, half_period: f64) -> Result<(), Rejection> {
        let thresholds = &self.config.thresholds;
        if half_period < 100.0 / thresholds.threshold3 {
            return Err(Rejection::NearNyquist);
        }
        if half_period > (self.window_len as f64 - 5.0) / 5.0 {
            return Err(Rejection::TooLongForWindow);
        }

        let freq = self.frequency_of(half_period);
        let filter = &self.config.filter;
        if filter.high_cut_hz > 0.0 && freq > filter.high_cut_hz * self.config.allowed_hp_ratio {
            return Err(Rejection::AboveHighCut);
        }
        if filter.low_cut_hz > 0.0 && freq < filter.low_cut_hz / self.config.allowed_lp_ratio {
            return Err(Rejection::BelowLowCut);
        }
        correction_factor(
            filter,
            freq,
            self.sample_rate,
            self.config.max_allowed_filter_correction,
            CorrectionOverflow::Reject,
        )
        .map(|_| ())
        .map_err(|err| match err {
            MeasureError::FilterCorrectionTooHigh { correction, .. } => {
                Rejection::CorrectionTooHigh { factor: correction }
            }
            // Only reachable at exactly Nyquist, with threshold3 at 100.
            MeasureError::Input(InputError::InvalidFrequency { .. }) => Rejection::NearNyquist,
            _ => Rejection::InvalidFilter,
        })
    }

    /// Validate every reading and combine the survivors.
    ///
    /// A window yields at most three readings (see [`half_period_candidates`]).
    /// Longer slices are accepted: the survivors are sorted and the middle
    /// three are combined as a triple.
    ///
    /// When every reading is lost to the correction limit the error is
    /// [`MeasureError::FilterCorrectionTooHigh`]; any other total loss is
    /// [`MeasureError::NoValidPeriod`].
    pub fn resolve(&self, candidates: &[HalfPeriodCandidate]) -> Result<HalfPeriod, MeasureError> {
        let mut valid = Vec::with_capacity(candidates.len());
        let mut lowest_rejected_correction: Option<f64> = None;
        let mut other_rejections = 0;

        for candidate in candidates {
            match self.validate(candidate.samples) {
                Ok(()) => valid.push(candidate.samples),
                Err(reason) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        source = ?candidate.source,
                        half_period = candidate.samples,
                        reason = %reason,
                        "half-period reading rejected"
                    );
                    if let Rejection::CorrectionTooHigh { factor } = reason {
                        let lowest = lowest_rejected_correction.get_or_insert(factor);
                        *lowest = lowest.min(factor);
                    } else {
                        other_rejections += 1;
                    }
                }
            }
        }
        valid.sort_by(f64::total_cmp);

        let resolved = match *valid.as_slice() {
            [] => match lowest_rejected_correction {
                Some(correction) if other_rejections == 0 => {
                    Err(MeasureError::FilterCorrectionTooHigh {
                        correction,
                        limit: self.config.max_allowed_filter_correction,
                    })
                }
                _ => Err(MeasureError::NoValidPeriod {
                    candidates: candidates.len(),
                }),
            },
            [a] => self.single(a),
            [a, b] => self.pair(a, b),
            [a, b, c] => self.triple(a, b, c),
            _ => {
                let mid = valid.len() / 2;
                self.triple(valid[mid - 1], valid[mid], valid[mid + 1])
            }
        }?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            half_period = resolved.samples,
            readings_used = resolved.readings_used,
            "half period resolved"
        );
        Ok(resolved)
    }

    fn single(&self, a: f64) -> Result<HalfPeriod, MeasureError> {
        if self.config.readings.require_multiple {
            return Err(MeasureError::SingleReadingRejected);
        }
        Ok(HalfPeriod {
            samples: a,
            readings_used: 1,
        })
    }

    fn pair(&self, a: f64, b: f64) -> Result<HalfPeriod, MeasureError> {
        if b / a > self.config.thresholds.threshold4 {
            return self.single(a);
        }
        Ok(HalfPeriod {
            samples: self.mean(&[a, b]),
            readings_used: 2,
        })
    }

    fn triple(&self, a: f64, b: f64, c: f64) -> Result<HalfPeriod, MeasureError> {
        let ratio = self.config.thresholds.threshold4;
        if a < b / ratio {
            return self.pair(b, c);
        }
        if c / a > ratio {
            return self.single(b);
        }
        Ok(HalfPeriod {
            samples: self.mean(&[a, b, c]),
            readings_used: 3,
        })
    }

    fn mean(&self, values: &[f64]) -> f64 {
        let n = values.len() as f64;
        match self.config.readings.combine {
            Combine::ArithmeticMean => values.iter().sum::<f64>() / n,
            Combine::GeometricMean => pow(values.iter().product::<f64>(), 1.0 / n),
        }
    }
}
