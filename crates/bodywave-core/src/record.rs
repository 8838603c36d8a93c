//! Table-style amplitude records.
//!
//! Station amplitude tables store every attempted measurement as an
//! `(amplitude, period, amptime)` row, with `-1` marking a failed reading.
//! [`AmplitudeRecord`] is that row. The sentinels exist only here; the kernel
//! itself always reports failures as [`MeasureError`].

use crate::error::MeasureError;
use crate::measure::MeasurementResult;

/// Value stored for an amplitude or period that could not be measured.
pub const NOT_AVAILABLE: f64 = -1.0;

/// One row of an amplitude table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeRecord {
    /// Half peak-to-peak amplitude, or [`NOT_AVAILABLE`].
    pub amplitude: f64,
    /// Period in seconds, or [`NOT_AVAILABLE`].
    pub period: f64,
    /// Absolute time of the maximum, if measured.
    pub amptime: Option<f64>,
}

impl AmplitudeRecord {
    /// Row for a failed measurement.
    pub const FAILED: Self = Self {
        amplitude: NOT_AVAILABLE,
        period: NOT_AVAILABLE,
        amptime: None,
    };

    /// True if the row holds a measurement.
    pub fn is_available(&self) -> bool {
        self.amptime.is_some()
    }
}

impl From<&MeasurementResult> for AmplitudeRecord {
    fn from(m: &MeasurementResult) -> Self {
        Self {
            amplitude: m.amplitude,
            period: m.period,
            amptime: Some(m.time_of_max),
        }
    }
}

impl From<&Result<MeasurementResult, MeasureError>> for AmplitudeRecord {
    fn from(result: &Result<MeasurementResult, MeasureError>) -> Self {
        match result {
            Ok(m) => m.into(),
            Err(_) => Self::FAILED,
        }
    }
}
