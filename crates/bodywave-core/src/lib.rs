//! Bodywave Core - amplitude and period of short-period body waves
//!
//! This crate measures the half peak-to-peak amplitude and the period of the
//! dominant swing in a window of a seismic trace, the quantities behind body-wave
//! (mb) and local (ml) magnitudes. The trace is expected to be filtered and
//! tapered by the caller; the kernel only borrows it.
//!
//! # Pipeline
//!
//! - [`classify`] - label each interior sample as peak, trough or neither
//! - [`eliminate`] - drop insignificant extrema pairs
//! - [`select_max_pair`] - pick the dominant peak-trough pair
//! - [`find_neighbors`] - the significant extrema either side of it
//! - [`refine_quad`] - sub-sample cosine / parabola fits
//! - [`HalfPeriodResolver`] - validate and combine half-period readings
//! - [`apply_filter_correction`] - undo the Butterworth attenuation
//!
//! [`AmpPeriodMeasurer`] runs all of them over a [`SampleWindow`] and returns
//! a [`MeasurementResult`] or a [`MeasureError`]. [`AmplitudeRecord`] turns
//! either into the `-1`-sentinel row used by amplitude tables.
//!
//! # no_std Support
//!
//! The kernel is `no_std` + `alloc` compatible. Disable the default `std`
//! feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! bodywave-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature for per-stage debug events.
//!
//! # Example
//!
//! ```rust
//! use bodywave_core::{AmpPeriodMeasurer, FilterSpec, MeasureConfig, SampleWindow};
//!
//! let sample_rate = 50.0;
//! let trace: Vec<f64> = (0..200)
//!     .map(|k| (2.0 * std::f64::consts::PI * 5.0 * k as f64 / sample_rate).sin())
//!     .collect();
//!
//! let window = SampleWindow::from_slice(&trace, sample_rate, 0.0).unwrap();
//! let measurer = AmpPeriodMeasurer::new(MeasureConfig {
//!     filter: FilterSpec::none(),
//!     ..MeasureConfig::default()
//! });
//! let m = measurer.measure(&window).unwrap();
//! assert!((m.period - 0.2).abs() < 0.01);
//! assert!((m.amplitude - 1.0).abs() < 0.05);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod classify;
pub mod config;
pub mod eliminate;
pub mod error;
pub mod filter_response;
pub mod measure;
pub mod neighbors;
pub mod period;
pub mod record;
pub mod refine;
pub mod select;
pub mod window;

// Re-export main types at crate root
pub use classify::{ExtremaLabels, ExtremumLabel, classify};
pub use config::{MeasureConfig, ThresholdClamp, Thresholds};
pub use eliminate::{Elimination, eliminate, max_amplitude};
pub use error::{InputError, MeasureError, RefineFailure};
pub use filter_response::{
    Band, CorrectionOverflow, FilterCorrection, FilterSpec, MAX_FILTER_ORDER,
    apply_filter_correction, butterworth_gain, correction_factor,
};
pub use measure::{AmpPeriodMeasurer, MeasurementResult, measure_amp_period};
pub use neighbors::{CentralQuad, find_neighbors};
pub use period::{
    CandidateSource, Combine, HalfPeriod, HalfPeriodCandidate, HalfPeriodResolver, ReadingPolicy,
    Rejection, half_period_candidates,
};
pub use record::{AmplitudeRecord, NOT_AVAILABLE};
pub use refine::{
    Refined, RefinedPosition, RefinedQuad, RefinementMode, cos_parameters, lagrange3,
    refine_central, refine_quad, refine_side,
};
pub use select::{ExtremumPair, PairSelection, select_max_pair};
pub use window::{MIN_WINDOW_LEN, SampleWindow};
