//! Neighbour extrema around the dominant pair.
//!
//! The extremum just before the pair and the one just after it give two more
//! half-period readings. A neighbour only counts if its swing to the adjacent
//! pair endpoint is at least `threshold2` percent of the pair's swing;
//! otherwise it is treated as absent.

use crate::classify::ExtremaLabels;
use crate::select::ExtremumPair;

/// Up to four extremum indices centred on the dominant pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CentralQuad {
    /// Significant extremum before the pair, if any.
    pub backward: Option<usize>,
    /// Earlier extremum of the pair.
    pub center_left: usize,
    /// Later extremum of the pair.
    pub center_right: usize,
    /// Significant extremum after the pair, if any.
    pub forward: Option<usize>,
}

impl CentralQuad {
    /// Quad with no accepted neighbours.
    pub fn from_pair(pair: &ExtremumPair) -> Self {
        Self {
            backward: None,
            center_left: pair.left,
            center_right: pair.right,
            forward: None,
        }
    }
}

/// Locate the significant extrema on either side of `pair`.
pub fn find_neighbors(
    samples: &[f64],
    labels: &ExtremaLabels,
    pair: &ExtremumPair,
    threshold2_percent: f64,
) -> CentralQuad {
    let min_swing = 0.01 * threshold2_percent * pair.swing;
    let significant = |neighbor: usize, endpoint: usize| {
        (samples[neighbor] - samples[endpoint]).abs() >= min_swing
    };

    let backward = labels
        .previous_extremum(pair.left)
        .filter(|&b| significant(b, pair.left));
    let forward = labels
        .next_extremum(pair.right)
        .filter(|&f| significant(f, pair.right));

    #[cfg(feature = "tracing")]
    tracing::debug!(?backward, ?forward, min_swing, "neighbour extrema");

    CentralQuad {
        backward,
        center_left: pair.left,
        center_right: pair.right,
        forward,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    fn pair(y: &[f64], left: usize, right: usize) -> ExtremumPair {
        ExtremumPair {
            left,
            right,
            swing: (y[right] - y[left]).abs(),
        }
    }

    #[test]
    fn both_neighbours_found() {
        let y = [0.0, -1.0, 2.0, -2.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        let quad = find_neighbors(&y, &labels, &pair(&y, 2, 3), 30.0);
        assert_eq!(quad.backward, Some(1));
        assert_eq!(quad.forward, Some(4));
    }

    #[test]
    fn weak_neighbour_discarded() {
        // Backward swing 0.3 against a pair swing of 4.0 is under 30%.
        let y = [0.0, 1.8, 1.7, 2.0, -2.0, 1.0, 0.0];
        let labels = classify(&y).unwrap();
        let quad = find_neighbors(&y, &labels, &pair(&y, 3, 4), 30.0);
        assert_eq!(quad.backward, None);
        assert_eq!(quad.forward, Some(5));
    }

    #[test]
    fn none_at_window_edges() {
        let y = [0.0, 2.0, -2.0, 0.0, 0.0];
        let labels = classify(&y).unwrap();
        let quad = find_neighbors(&y, &labels, &pair(&y, 1, 2), 30.0);
        assert_eq!(quad, CentralQuad::from_pair(&pair(&y, 1, 2)));
    }
}
