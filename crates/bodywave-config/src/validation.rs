//! Profile validation.
//!
//! Thresholds outside their documented ranges are not errors: the kernel
//! clamps them and reports the clamp. Validation only rejects what cannot be
//! measured with at all: an impossible filter, negative durations and values
//! that are not numbers.
//!
//! # Example
//!
//! ```rust
//! use bodywave_config::{Profile, validate_profile};
//!
//! let profile = Profile::new("mb");
//! validate_profile(&profile).expect("defaults are valid");
//! ```

use bodywave_core::MAX_FILTER_ORDER;
use thiserror::Error;

use crate::profile::Profile;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Filter order above what the corrector supports.
    #[error("filter_order {order} exceeds maximum {max}")]
    FilterOrder {
        /// Configured order.
        order: u32,
        /// Highest supported order.
        max: u32,
    },

    /// A corner frequency is negative.
    #[error("{param} must not be negative, got {value}")]
    NegativeCutoff {
        /// Name of the corner.
        param: &'static str,
        /// Configured value.
        value: f64,
    },

    /// Band-pass corners are not ordered.
    #[error("low_cut_hz {low} must be below high_cut_hz {high}")]
    InvertedBand {
        /// Low corner.
        low: f64,
        /// High corner.
        high: f64,
    },

    /// A window duration is negative.
    #[error("{param} must not be negative, got {value}")]
    NegativeDuration {
        /// Name of the duration.
        param: &'static str,
        /// Configured value.
        value: f64,
    },

    /// A numeric option is NaN or infinite.
    #[error("{param} is not a finite number")]
    NonFinite {
        /// Name of the option.
        param: &'static str,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn numeric_options(profile: &Profile) -> [(&'static str, f64); 15] {
    [
        ("low_cut_hz", profile.low_cut_hz),
        ("high_cut_hz", profile.high_cut_hz),
        ("taper_fraction", profile.taper_fraction),
        ("threshold1", profile.threshold1),
        ("threshold2", profile.threshold2),
        ("threshold3", profile.threshold3),
        ("threshold4", profile.threshold4),
        ("threshold5", profile.threshold5),
        ("threshold6", profile.threshold6),
        ("allowed_hp_ratio", profile.allowed_hp_ratio),
        ("allowed_lp_ratio", profile.allowed_lp_ratio),
        (
            "max_allowed_filter_correction",
            profile.max_allowed_filter_correction,
        ),
        ("lead_seconds", profile.lead_seconds),
        ("length_seconds", profile.length_seconds),
        ("filter_margin_seconds", profile.filter_margin_seconds),
    ]
}

/// Validate a profile, collecting every problem found.
pub fn validate_profile(profile: &Profile) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if profile.filter_order > MAX_FILTER_ORDER {
        errors.push(ValidationError::FilterOrder {
            order: profile.filter_order,
            max: MAX_FILTER_ORDER,
        });
    }

    for (param, value) in numeric_options(profile) {
        if !value.is_finite() {
            errors.push(ValidationError::NonFinite { param });
        }
    }

    for (param, value) in [
        ("low_cut_hz", profile.low_cut_hz),
        ("high_cut_hz", profile.high_cut_hz),
    ] {
        if value < 0.0 {
            errors.push(ValidationError::NegativeCutoff { param, value });
        }
    }
    if profile.low_cut_hz > 0.0
        && profile.high_cut_hz > 0.0
        && profile.low_cut_hz >= profile.high_cut_hz
    {
        errors.push(ValidationError::InvertedBand {
            low: profile.low_cut_hz,
            high: profile.high_cut_hz,
        });
    }

    for (param, value) in [
        ("lead_seconds", profile.lead_seconds),
        ("length_seconds", profile.length_seconds),
        ("filter_margin_seconds", profile.filter_margin_seconds),
    ] {
        if value < 0.0 {
            errors.push(ValidationError::NegativeDuration { param, value });
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_is_valid() {
        assert_eq!(validate_profile(&Profile::default()), Ok(()));
    }

    #[test]
    fn out_of_range_thresholds_are_not_errors() {
        let mut profile = Profile::default();
        profile.threshold1 = -5.0;
        profile.threshold6 = 250.0;
        assert_eq!(validate_profile(&profile), Ok(()));
    }

    #[test]
    fn single_error_is_returned_directly() {
        let mut profile = Profile::default();
        profile.filter_order = 11;
        assert_eq!(
            validate_profile(&profile),
            Err(ValidationError::FilterOrder { order: 11, max: 10 })
        );
    }

    #[test]
    fn inverted_band_rejected() {
        let mut profile = Profile::default();
        profile.low_cut_hz = 5.0;
        profile.high_cut_hz = 2.0;
        assert!(matches!(
            validate_profile(&profile),
            Err(ValidationError::InvertedBand { .. })
        ));
    }

    #[test]
    fn open_side_is_not_inverted() {
        let mut profile = Profile::default();
        profile.low_cut_hz = 5.0;
        profile.high_cut_hz = 0.0;
        assert_eq!(validate_profile(&profile), Ok(()));
    }

    #[test]
    fn errors_are_collected() {
        let mut profile = Profile::default();
        profile.lead_seconds = -1.0;
        profile.threshold3 = f64::NAN;
        profile.low_cut_hz = -0.5;
        let Err(ValidationError::Multiple(errors)) = validate_profile(&profile) else {
            panic!("expected multiple errors");
        };
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::NonFinite {
            param: "threshold3"
        }));
        assert!(errors.contains(&ValidationError::NegativeDuration {
            param: "lead_seconds",
            value: -1.0
        }));
    }

    #[test]
    fn multiple_display_joins() {
        let err = ValidationError::Multiple(vec![
            ValidationError::NonFinite { param: "threshold1" },
            ValidationError::FilterOrder { order: 12, max: 10 },
        ]);
        assert_eq!(
            err.to_string(),
            "multiple validation errors: threshold1 is not a finite number; filter_order 12 exceeds maximum 10"
        );
    }
}
