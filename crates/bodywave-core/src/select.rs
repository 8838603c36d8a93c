//! Dominant peak-trough pair selection.
//!
//! The first pass finds the largest swing between adjacent surviving extrema.
//! The second pass walks from the window start and takes the first pair whose
//! swing reaches `threshold6` percent of that maximum, so a pair early in the
//! window wins over a marginally larger one later on.
//!
//! After selection the partial swings between each window edge and its
//! nearest extremum are compared against the chosen pair. An edge swing larger
//! than `pair_swing * 100 / threshold6` means the real maximum lies outside
//! the window, and the measurement is refused.

use crate::classify::ExtremaLabels;
use crate::error::MeasureError;

/// Two adjacent labelled extrema, `left < right`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtremumPair {
    /// Window index of the earlier extremum.
    pub left: usize,
    /// Window index of the later extremum.
    pub right: usize,
    /// `|value(right) - value(left)|`.
    pub swing: f64,
}

/// Result of pair selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairSelection {
    /// The chosen pair.
    pub pair: ExtremumPair,
    /// Largest adjacent swing in the window.
    pub max_swing: f64,
}

/// Pick the dominant pair from the surviving extrema.
pub fn select_max_pair(
    samples: &[f64],
    labels: &ExtremaLabels,
    threshold6_percent: f64,
) -> Result<PairSelection, MeasureError> {
    let positions = labels.positions();
    if positions.len() < 2 {
        return Err(MeasureError::NoQualifyingPair {
            peaks: labels.peak_count(),
            troughs: labels.trough_count(),
        });
    }

    let swing_of = |w: &[usize]| (samples[w[1]] - samples[w[0]]).abs();

    let max_swing = positions
        .windows(2)
        .map(swing_of)
        .fold(0.0_f64, f64::max);

    let accept = 0.01 * threshold6_percent * max_swing;
    let pair = positions
        .windows(2)
        .find(|w| swing_of(w) >= accept)
        .map(|w| ExtremumPair {
            left: w[0],
            right: w[1],
            swing: swing_of(w),
        })
        .ok_or(MeasureError::NoQualifyingPair {
            peaks: labels.peak_count(),
            troughs: labels.trough_count(),
        })?;

    check_window_edges(samples, &positions, pair, threshold6_percent)?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        left = pair.left,
        right = pair.right,
        swing = pair.swing,
        max_swing,
        "selected max pair"
    );

    Ok(PairSelection { pair, max_swing })
}

fn check_window_edges(
    samples: &[f64],
    positions: &[usize],
    pair: ExtremumPair,
    threshold6_percent: f64,
) -> Result<(), MeasureError> {
    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return Ok(());
    };
    let n = samples.len();
    let edge_swing = (samples[0] - samples[first])
        .abs()
        .max((samples[n - 1] - samples[last]).abs());

    let limit = if threshold6_percent > 0.0 {
        pair.swing * 100.0 / threshold6_percent
    } else {
        f64::INFINITY
    };

    if edge_swing > limit {
        return Err(MeasureError::WindowImproperlySelected {
            edge_swing,
            pair_swing: pair.swing,
        });
    }
    Ok(())
}
