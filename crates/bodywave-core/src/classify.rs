//! Peak/trough classification.
//!
//! Scans the window left to right tracking the direction of the signal and
//! labels each interior sample where the direction turns. A plateau of equal
//! values at a turn receives a single label on its centre sample; the rest of
//! the run stays [`ExtremumLabel::Neither`], so two adjacent samples never
//! carry the same label.
//!
//! The first and last samples are never labelled: nothing outside the window
//! confirms them as extrema.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::{InputError, MeasureError};
use crate::window::MIN_WINDOW_LEN;

/// Per-sample extremum tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtremumLabel {
    /// Local maximum.
    Peak,
    /// Local minimum.
    Trough,
    /// Not an extremum (or eliminated).
    #[default]
    Neither,
}

impl ExtremumLabel {
    /// True for `Peak` or `Trough`.
    #[inline]
    pub fn is_extremum(self) -> bool {
        self != Self::Neither
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ascending,
    Descending,
    Flat,
}

impl Direction {
    #[inline]
    fn of_step(from: f64, to: f64) -> Self {
        if to > from {
            Self::Ascending
        } else if to < from {
            Self::Descending
        } else {
            Self::Flat
        }
    }
}

/// Label array for one window, mutated in place by elimination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtremaLabels {
    labels: Vec<ExtremumLabel>,
}

impl ExtremaLabels {
    /// Wrap an existing label array.
    pub fn from_labels(labels: Vec<ExtremumLabel>) -> Self {
        Self { labels }
    }

    /// Label of sample `index`.
    #[inline]
    pub fn get(&self, index: usize) -> ExtremumLabel {
        self.labels.get(index).copied().unwrap_or_default()
    }

    /// Underlying labels, one per window sample.
    #[inline]
    pub fn as_slice(&self) -> &[ExtremumLabel] {
        &self.labels
    }

    /// Window length the labels cover.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if the label array covers no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Relabel a sample as `Neither`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        if let Some(label) = self.labels.get_mut(index) {
            *label = ExtremumLabel::Neither;
        }
    }

    /// Positions of all labelled extrema, in window order.
    pub fn positions(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_extremum())
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of labelled extrema.
    pub fn extremum_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_extremum()).count()
    }

    /// Number of peaks.
    pub fn peak_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l == ExtremumLabel::Peak)
            .count()
    }

    /// Number of troughs.
    pub fn trough_count(&self) -> usize {
        self.labels
            .iter()
            .filter(|&&l| l == ExtremumLabel::Trough)
            .count()
    }

    /// Nearest labelled extremum strictly before `index`.
    pub fn previous_extremum(&self, index: usize) -> Option<usize> {
        self.labels[..index.min(self.labels.len())]
            .iter()
            .rposition(|l| l.is_extremum())
    }

    /// Nearest labelled extremum strictly after `index`.
    pub fn next_extremum(&self, index: usize) -> Option<usize> {
        let start = index.saturating_add(1);
        if start >= self.labels.len() {
            return None;
        }
        self.labels[start..]
            .iter()
            .position(|l| l.is_extremum())
            .map(|p| p + start)
    }
}

/// Label every interior sample of `samples` as peak, trough or neither.
///
/// Fails with [`MeasureError::ConstantSignal`] when the signal never turns and
/// with [`MeasureError::NoQualifyingPair`] when only one kind of extremum is
/// present.
pub fn classify(samples: &[f64]) -> Result<ExtremaLabels, MeasureError> {
    let n = samples.len();
    if n < MIN_WINDOW_LEN {
        return Err(InputError::WindowTooShort {
            len: n,
            min: MIN_WINDOW_LEN,
        }
        .into());
    }

    let mut labels = vec![ExtremumLabel::Neither; n];
    let mut direction = Direction::Flat;
    // First sample of the current run of equal values.
    let mut run_start = 0;
    let mut turned = false;

    for i in 1..n {
        let step = Direction::of_step(samples[i - 1], samples[i]);
        if step == Direction::Flat {
            continue;
        }
        if direction != Direction::Flat && step != direction {
            let at = run_start + (i - 1 - run_start) / 2;
            if at > 0 && at < n - 1 {
                labels[at] = if step == Direction::Ascending {
                    ExtremumLabel::Trough
                } else {
                    ExtremumLabel::Peak
                };
            }
            turned = true;
        }
        direction = step;
        run_start = i;
    }

    if !turned {
        return Err(MeasureError::ConstantSignal);
    }

    let labels = ExtremaLabels { labels };
    let (peaks, troughs) = (labels.peak_count(), labels.trough_count());
    if peaks == 0 || troughs == 0 {
        return Err(MeasureError::NoQualifyingPair { peaks, troughs });
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(peaks, troughs, "classified extrema");

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ExtremumLabel::{Neither, Peak, Trough};

    #[test]
    fn zigzag_alternates() {
        let y = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        assert_eq!(
            labels.as_slice(),
            &[Neither, Peak, Neither, Trough, Neither, Peak, Neither]
        );
    }

    #[test]
    fn plateau_gets_a_single_label() {
        let y = [0.0, 1.0, 2.0, 2.0, 2.0, 1.0, 0.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        assert_eq!(labels.positions(), vec![3, 6, 7]);
        assert_eq!(labels.get(3), Peak);
        assert_eq!(labels.get(6), Trough);
        assert_eq!(labels.get(7), Peak);
    }

    #[test]
    fn two_sample_plateau_labels_first() {
        let y = [0.0, 1.0, 1.0, 0.0, -1.0, 0.0];
        let labels = classify(&y).unwrap();
        assert_eq!(labels.get(1), Peak);
        assert_eq!(labels.get(2), Neither);
        assert_eq!(labels.get(4), Trough);
    }

    #[test]
    fn edges_never_labelled() {
        let y = [5.0, 0.0, 1.0, 0.0, 1.0, 0.0, 5.0];
        let labels = classify(&y).unwrap();
        assert_eq!(labels.get(0), Neither);
        assert_eq!(labels.get(6), Neither);
    }

    #[test]
    fn constant_signal_fails() {
        let y = [3.0; 50];
        assert_eq!(classify(&y), Err(MeasureError::ConstantSignal));
    }

    #[test]
    fn monotonic_ramp_fails_as_constant() {
        let y: Vec<f64> = (0..20).map(f64::from).collect();
        assert_eq!(classify(&y), Err(MeasureError::ConstantSignal));
    }

    #[test]
    fn single_hump_has_no_pair() {
        let y = [0.0, 1.0, 2.0, 1.0, 0.0];
        assert_eq!(
            classify(&y),
            Err(MeasureError::NoQualifyingPair {
                peaks: 1,
                troughs: 0
            })
        );
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(
            classify(&[0.0, 1.0, 0.0, 1.0]),
            Err(MeasureError::Input(InputError::WindowTooShort { .. }))
        ));
    }

    #[test]
    fn neighbour_lookup() {
        let y = [0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        assert_eq!(labels.previous_extremum(3), Some(1));
        assert_eq!(labels.previous_extremum(1), None);
        assert_eq!(labels.next_extremum(3), Some(5));
        assert_eq!(labels.next_extremum(5), None);
    }
}
