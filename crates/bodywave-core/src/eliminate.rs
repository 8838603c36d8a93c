//! Iterative elimination of insignificant extrema.
//!
//! Small wiggles riding on the main oscillation produce peak/trough pairs whose
//! swing is tiny compared to the window's range. Each round removes the
//! adjacent pair with the smallest swing while that swing is below
//! `threshold1` percent of the window's peak-to-trough range.
//!
//! The first and last surviving extrema are never removed; pair selection uses
//! them to check whether the largest swing is cut by the window edge. Exactly
//! one pair disappears per round, so the loop runs at most `extrema / 2` times.

use crate::classify::{ExtremaLabels, ExtremumLabel};

/// Summary of one elimination run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elimination {
    /// Highest peak minus lowest trough, over interior samples.
    pub max_amp: f64,
    /// Absolute swing below which a pair is removed.
    pub threshold: f64,
    /// Rounds executed (one pair removed per round).
    pub iterations: usize,
}

/// Highest peak value minus lowest trough value.
///
/// Returns 0.0 when either kind of extremum is missing.
pub fn max_amplitude(samples: &[f64], labels: &ExtremaLabels) -> f64 {
    let mut highest_peak = f64::NEG_INFINITY;
    let mut lowest_trough = f64::INFINITY;
    for (&value, &label) in samples.iter().zip(labels.as_slice()) {
        match label {
            ExtremumLabel::Peak => highest_peak = highest_peak.max(value),
            ExtremumLabel::Trough => lowest_trough = lowest_trough.min(value),
            ExtremumLabel::Neither => {}
        }
    }
    if highest_peak.is_finite() && lowest_trough.is_finite() {
        highest_peak - lowest_trough
    } else {
        0.0
    }
}

/// Remove adjacent extrema pairs whose swing is under `threshold1_percent`
/// of the window range, smallest first.
pub fn eliminate(
    samples: &[f64],
    labels: &mut ExtremaLabels,
    threshold1_percent: f64,
) -> Elimination {
    let max_amp = max_amplitude(samples, labels);
    let threshold = 0.01 * threshold1_percent * max_amp;
    let mut positions = labels.positions();
    let mut iterations = 0;

    while positions.len() >= 4 {
        // Pairs (k, k + 1) that touch neither the first nor the last extremum.
        let smallest = (1..positions.len() - 2)
            .map(|k| (k, (samples[positions[k + 1]] - samples[positions[k]]).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        let Some((k, swing)) = smallest else { break };
        if swing >= threshold {
            break;
        }

        labels.clear(positions[k]);
        labels.clear(positions[k + 1]);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            left = positions[k],
            right = positions[k + 1],
            swing,
            "eliminated extrema pair"
        );
        positions.drain(k..=k + 1);
        iterations += 1;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        max_amp,
        threshold,
        iterations,
        remaining = positions.len(),
        "elimination finished"
    );

    Elimination {
        max_amp,
        threshold,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    #[test]
    fn max_amplitude_spans_peak_to_trough() {
        let y = [0.0, 2.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        assert_eq!(max_amplitude(&y, &labels), 3.0);
    }

    #[test]
    fn small_wiggle_removed() {
        // Large swing with a 0.1 wiggle on the descending flank.
        let y = [0.0, 1.0, 0.5, 0.6, -1.0, 0.0, 1.0, -1.0, 0.0];
        let mut labels = classify(&y).unwrap();
        assert_eq!(labels.extremum_count(), 6);
        let report = eliminate(&y, &mut labels, 10.0);
        assert_eq!(report.iterations, 1);
        assert_eq!(labels.positions(), vec![1, 4, 6, 7]);
    }

    #[test]
    fn zero_threshold_keeps_everything() {
        let y = [0.0, 1.0, 0.5, 0.6, -1.0, 0.0, 1.0, -1.0, 0.0];
        let mut labels = classify(&y).unwrap();
        let before = labels.clone();
        let report = eliminate(&y, &mut labels, 0.0);
        assert_eq!(report.iterations, 0);
        assert_eq!(labels, before);
    }

    #[test]
    fn endpoints_survive_even_tiny_swings() {
        // First and last pairs are tiny, but they belong to the boundary extrema.
        let y = [0.0, 0.05, 0.0, 1.0, -1.0, 1.0, 0.0, 0.05, 0.1];
        let mut labels = classify(&y).unwrap();
        let first = labels.positions()[0];
        let last = *labels.positions().last().unwrap();
        eliminate(&y, &mut labels, 50.0);
        let after = labels.positions();
        assert_eq!(after[0], first);
        assert_eq!(*after.last().unwrap(), last);
    }

    #[test]
    fn three_extrema_untouched() {
        let y = [0.0, 1.0, 0.9, 1.0, 0.0];
        let mut labels = classify(&y).unwrap();
        assert_eq!(labels.extremum_count(), 3);
        let report = eliminate(&y, &mut labels, 100.0);
        assert_eq!(report.iterations, 0);
        assert_eq!(labels.extremum_count(), 3);
    }
}
