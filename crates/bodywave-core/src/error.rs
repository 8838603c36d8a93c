//! Error types for amplitude/period measurement.
//!
//! Every stage of the measurement returns a typed [`MeasureError`]. There is no
//! partial result: a call either yields a fully valid
//! [`MeasurementResult`](crate::MeasurementResult) or one of these errors.
//!
//! # Taxonomy
//!
//! | Variant | Stage | Fatal |
//! |---------|-------|-------|
//! | [`MeasureError::Input`] | window validation | always |
//! | [`MeasureError::ConstantSignal`] | classification | always |
//! | [`MeasureError::NoQualifyingPair`] | classification | always |
//! | [`MeasureError::SignalNotDetrended`] | detrend check | always |
//! | [`MeasureError::WindowImproperlySelected`] | pair selection | always |
//! | [`MeasureError::RefinementFailed`] | sub-sample refinement | central pair only |
//! | [`MeasureError::FilterCorrectionTooHigh`] | filter correction | when no candidate survives |
//! | [`MeasureError::NoValidPeriod`] | period resolution | always |
//! | [`MeasureError::SingleReadingRejected`] | period resolution | always |

use core::fmt;

/// Rejections raised before any computation on the window.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// The window holds fewer samples than the kernel needs.
    WindowTooShort {
        /// Samples in the window.
        len: usize,
        /// Minimum accepted length.
        min: usize,
    },
    /// The requested window does not lie inside the available data.
    WindowOutsideData {
        /// Requested first sample (may be negative for windows cut by time).
        offset: i64,
        /// Requested length in samples.
        len: usize,
        /// Samples available in the data buffer.
        available: usize,
    },
    /// Sample rate is zero, negative, or not finite.
    InvalidSampleRate(f64),
    /// Target frequency is not inside `(0, nyquist)`.
    InvalidFrequency {
        /// Offending frequency in Hz.
        freq_hz: f64,
        /// Nyquist frequency of the data in Hz.
        nyquist_hz: f64,
    },
    /// Butterworth order outside `[0, 10]`.
    InvalidFilterOrder(u32),
    /// A filter corner is negative, not finite, or at/above Nyquist.
    InvalidCutoff {
        /// Which corner (`"low_cut"` or `"high_cut"`).
        name: &'static str,
        /// Offending corner in Hz.
        freq_hz: f64,
        /// Nyquist frequency of the data in Hz.
        nyquist_hz: f64,
    },
    /// Band-pass corners are not ordered `low < high`.
    InvertedBand {
        /// Low corner in Hz.
        low_cut_hz: f64,
        /// High corner in Hz.
        high_cut_hz: f64,
    },
    /// A sample in the window is NaN or infinite.
    NonFiniteSample(usize),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowTooShort { len, min } => {
                write!(f, "window has {len} samples, at least {min} are required")
            }
            Self::WindowOutsideData {
                offset,
                len,
                available,
            } => write!(
                f,
                "window [{offset}, {offset}+{len}) lies outside the {available} available samples"
            ),
            Self::InvalidSampleRate(sr) => write!(f, "invalid sample rate {sr}"),
            Self::InvalidFrequency {
                freq_hz,
                nyquist_hz,
            } => write!(
                f,
                "frequency {freq_hz:.4} Hz is outside (0, {nyquist_hz:.4}) Hz"
            ),
            Self::InvalidFilterOrder(order) => {
                write!(f, "filter order {order} is outside [0, 10]")
            }
            Self::InvalidCutoff {
                name,
                freq_hz,
                nyquist_hz,
            } => write!(
                f,
                "{name} corner {freq_hz} Hz is invalid (nyquist {nyquist_hz} Hz)"
            ),
            Self::InvertedBand {
                low_cut_hz,
                high_cut_hz,
            } => write!(
                f,
                "band-pass corners inverted: low {low_cut_hz} Hz >= high {high_cut_hz} Hz"
            ),
            Self::NonFiniteSample(index) => write!(f, "sample {index} is not finite"),
        }
    }
}

/// Why a 3-point sub-sample fit could not be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RefineFailure {
    /// The three samples lie on a straight line.
    Collinear,
    /// The cosine model has no real solution (`|factor| >= 1` or zero centre).
    NoRealSolution {
        /// The cosine factor `(y1 + y-1) / (2 y0)`.
        factor: f64,
    },
    /// The parabola vertex lies a full sample or more from the centre.
    ShiftOutOfRange {
        /// Vertex offset in samples.
        shift: f64,
    },
    /// The extremum has no neighbour sample on one side.
    AtWindowEdge,
    /// The refined pair values no longer differ.
    DegenerateSwing,
}

impl fmt::Display for RefineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collinear => write!(f, "samples are collinear"),
            Self::NoRealSolution { factor } => {
                write!(f, "cosine factor {factor:.6} has no real solution")
            }
            Self::ShiftOutOfRange { shift } => {
                write!(f, "vertex shift {shift:.3} samples is out of range")
            }
            Self::AtWindowEdge => write!(f, "extremum sits on the window edge"),
            Self::DegenerateSwing => write!(f, "refined pair has no swing"),
        }
    }
}

/// Errors returned by the measurement kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// The window or its parameters were rejected before computation.
    Input(InputError),
    /// The signal never changes direction.
    ConstantSignal,
    /// The labelled extrema contain no peak or no trough.
    NoQualifyingPair {
        /// Peaks found.
        peaks: usize,
        /// Troughs found.
        troughs: usize,
    },
    /// The window mean is too large relative to the peak-to-trough range.
    SignalNotDetrended {
        /// `100 * |mean| / maxamp`.
        mean_percent: f64,
        /// Configured `threshold5`.
        limit: f64,
    },
    /// The largest swing is cut by the window boundary.
    WindowImproperlySelected {
        /// Swing between a boundary sample and its nearest extremum.
        edge_swing: f64,
        /// Swing of the selected pair.
        pair_swing: f64,
    },
    /// A central extremum could not be refined.
    RefinementFailed {
        /// Window index of the extremum.
        index: usize,
        /// Why the fit failed.
        reason: RefineFailure,
    },
    /// Correcting for the filter would amplify beyond the configured limit.
    FilterCorrectionTooHigh {
        /// Required correction factor.
        correction: f64,
        /// Configured `maxAllowedFilterCorrection`.
        limit: f64,
    },
    /// Every half-period candidate was rejected.
    NoValidPeriod {
        /// Candidates considered before validation.
        candidates: usize,
    },
    /// Only one half-period reading survived and the policy requires two.
    SingleReadingRejected,
}

impl fmt::Display for MeasureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(err) => write!(f, "invalid input: {err}"),
            Self::ConstantSignal => write!(f, "signal is constant over the window"),
            Self::NoQualifyingPair { peaks, troughs } => write!(
                f,
                "no peak/trough pair in window ({peaks} peaks, {troughs} troughs)"
            ),
            Self::SignalNotDetrended {
                mean_percent,
                limit,
            } => write!(
                f,
                "signal not detrended: mean is {mean_percent:.1}% of max amplitude (limit {limit}%)"
            ),
            Self::WindowImproperlySelected {
                edge_swing,
                pair_swing,
            } => write!(
                f,
                "window improperly selected: edge swing {edge_swing:.4} exceeds pair swing {pair_swing:.4}"
            ),
            Self::RefinementFailed { index, reason } => {
                write!(f, "sub-sample refinement failed at sample {index}: {reason}")
            }
            Self::FilterCorrectionTooHigh { correction, limit } => write!(
                f,
                "filter correction {correction:.3} exceeds allowed {limit:.3}"
            ),
            Self::NoValidPeriod { candidates } => write!(
                f,
                "no valid period: all {candidates} half-period readings rejected"
            ),
            Self::SingleReadingRejected => {
                write!(f, "only one half-period reading available, two required")
            }
        }
    }
}

impl From<InputError> for MeasureError {
    fn from(err: InputError) -> Self {
        Self::Input(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InputError {}

#[cfg(feature = "std")]
impl std::error::Error for RefineFailure {}

#[cfg(feature = "std")]
impl std::error::Error for MeasureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Input(err) => Some(err),
            Self::RefinementFailed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_error_converts() {
        let err: MeasureError = InputError::WindowTooShort { len: 4, min: 5 }.into();
        assert!(matches!(
            err,
            MeasureError::Input(InputError::WindowTooShort { len: 4, min: 5 })
        ));
    }

    #[test]
    fn display_is_human_readable() {
        let err = MeasureError::Input(InputError::WindowTooShort { len: 4, min: 5 });
        assert_eq!(
            err.to_string(),
            "invalid input: window has 4 samples, at least 5 are required"
        );
        assert_eq!(
            MeasureError::ConstantSignal.to_string(),
            "signal is constant over the window"
        );
    }

    #[test]
    fn source_chain_exposes_detail() {
        use std::error::Error;
        let err = MeasureError::RefinementFailed {
            index: 10,
            reason: RefineFailure::Collinear,
        };
        assert!(err.source().is_some());
        assert!(MeasureError::SingleReadingRejected.source().is_none());
    }
}
