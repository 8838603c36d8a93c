//! Borrowed measurement windows.
//!
//! A [`SampleWindow`] is a bounds-checked view into a caller-owned, already
//! filtered and tapered buffer. It carries its own offset, sample rate and
//! absolute start time so later stages never do index arithmetic against the
//! parent buffer.

use crate::error::InputError;
use libm::round;

/// Smallest window the measurement kernel accepts.
pub const MIN_WINDOW_LEN: usize = 5;

/// Immutable view of the samples to measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWindow<'a> {
    samples: &'a [f64],
    offset: usize,
    sample_rate: f64,
    start_time: f64,
}

impl<'a> SampleWindow<'a> {
    /// Borrow `data[offset..offset + len]`.
    ///
    /// `data_start_time` is the absolute time (seconds) of `data[0]`; the
    /// window's start time is derived from it.
    pub fn new(
        data: &'a [f64],
        offset: usize,
        len: usize,
        sample_rate: f64,
        data_start_time: f64,
    ) -> Result<Self, InputError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(InputError::InvalidSampleRate(sample_rate));
        }
        let end = offset.checked_add(len);
        let samples = match end {
            Some(end) if end <= data.len() => &data[offset..end],
            _ => {
                return Err(InputError::WindowOutsideData {
                    offset: offset as i64,
                    len,
                    available: data.len(),
                });
            }
        };
        if samples.len() < MIN_WINDOW_LEN {
            return Err(InputError::WindowTooShort {
                len: samples.len(),
                min: MIN_WINDOW_LEN,
            });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(InputError::NonFiniteSample(index));
        }

        Ok(Self {
            samples,
            offset,
            sample_rate,
            start_time: data_start_time + offset as f64 / sample_rate,
        })
    }

    /// Use a whole slice as the window.
    pub fn from_slice(
        samples: &'a [f64],
        sample_rate: f64,
        start_time: f64,
    ) -> Result<Self, InputError> {
        Self::new(samples, 0, samples.len(), sample_rate, start_time)
    }

    /// Cut `[arrival - lead, arrival - lead + length)` seconds out of `data`.
    ///
    /// Any part of the span falling outside the buffer is an error; the
    /// window is never silently shortened.
    pub fn around_arrival(
        data: &'a [f64],
        sample_rate: f64,
        data_start_time: f64,
        arrival_time: f64,
        lead_seconds: f64,
        length_seconds: f64,
    ) -> Result<Self, InputError> {
        if !sample_rate.is_finite() || sample_rate <= 0.0 {
            return Err(InputError::InvalidSampleRate(sample_rate));
        }
        let first = round((arrival_time - lead_seconds - data_start_time) * sample_rate) as i64;
        let len = round(length_seconds.max(0.0) * sample_rate) as usize;
        if first < 0 {
            return Err(InputError::WindowOutsideData {
                offset: first,
                len,
                available: data.len(),
            });
        }
        Self::new(data, first as usize, len, sample_rate, data_start_time)
    }

    /// The window's samples.
    #[inline]
    pub fn samples(&self) -> &'a [f64] {
        self.samples
    }

    /// Number of samples in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed window; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Index of the first window sample in the parent buffer.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Sample rate in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Sampling interval in seconds.
    #[inline]
    pub fn sample_interval(&self) -> f64 {
        1.0 / self.sample_rate
    }

    /// Nyquist frequency in Hz.
    #[inline]
    pub fn nyquist(&self) -> f64 {
        0.5 * self.sample_rate
    }

    /// Absolute time of the first window sample.
    #[inline]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Absolute time of a (possibly fractional) position inside the window.
    #[inline]
    pub fn time_at(&self, position: f64) -> f64 {
        self.start_time + position / self.sample_rate
    }

    /// Arithmetic mean of the window.
    pub fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_borrows_requested_range() {
        let data: Vec<f64> = (0..20).map(f64::from).collect();
        let w = SampleWindow::new(&data, 5, 10, 10.0, 100.0).unwrap();
        assert_eq!(w.len(), 10);
        assert_eq!(w.samples()[0], 5.0);
        assert!((w.start_time() - 100.5).abs() < 1e-12);
        assert!((w.time_at(2.5) - 100.75).abs() < 1e-12);
    }

    #[test]
    fn too_short_window_rejected() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            SampleWindow::from_slice(&data, 20.0, 0.0),
            Err(InputError::WindowTooShort { len: 4, min: 5 })
        );
    }

    #[test]
    fn window_past_end_rejected() {
        let data = [0.0; 10];
        assert!(matches!(
            SampleWindow::new(&data, 6, 5, 20.0, 0.0),
            Err(InputError::WindowOutsideData { available: 10, .. })
        ));
    }

    #[test]
    fn invalid_sample_rate_rejected() {
        let data = [0.0; 10];
        assert_eq!(
            SampleWindow::from_slice(&data, 0.0, 0.0),
            Err(InputError::InvalidSampleRate(0.0))
        );
        assert!(SampleWindow::from_slice(&data, f64::NAN, 0.0).is_err());
    }

    #[test]
    fn non_finite_sample_rejected() {
        let data = [0.0, 1.0, f64::NAN, 1.0, 0.0];
        assert_eq!(
            SampleWindow::from_slice(&data, 20.0, 0.0),
            Err(InputError::NonFiniteSample(2))
        );
    }

    #[test]
    fn arrival_window_cut_by_time() {
        let data = vec![0.0; 400];
        let w = SampleWindow::around_arrival(&data, 20.0, 1000.0, 1005.0, 1.0, 5.0).unwrap();
        assert_eq!(w.offset(), 80);
        assert_eq!(w.len(), 100);
        assert!((w.start_time() - 1004.0).abs() < 1e-9);
    }

    #[test]
    fn arrival_window_before_data_rejected() {
        let data = vec![0.0; 400];
        assert!(matches!(
            SampleWindow::around_arrival(&data, 20.0, 1000.0, 1000.5, 1.0, 5.0),
            Err(InputError::WindowOutsideData { offset: -10, .. })
        ));
    }
}
