//! Measurement profile file format and operations.

use bodywave_core::{
    Combine, CorrectionOverflow, FilterSpec, MeasureConfig, ReadingPolicy, RefinementMode,
    Thresholds,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::validate_profile;

/// Sub-sample fit named in a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    /// Cosine fit, parabola fallback for side extrema.
    #[default]
    CosineWithFallback,
    /// Parabola fit everywhere.
    LagrangeOnly,
}

impl From<Refinement> for RefinementMode {
    fn from(r: Refinement) -> Self {
        match r {
            Refinement::CosineWithFallback => RefinementMode::CosineWithFallback,
            Refinement::LagrangeOnly => RefinementMode::LagrangeOnly,
        }
    }
}

impl From<RefinementMode> for Refinement {
    fn from(mode: RefinementMode) -> Self {
        match mode {
            RefinementMode::CosineWithFallback => Refinement::CosineWithFallback,
            RefinementMode::LagrangeOnly => Refinement::LagrangeOnly,
        }
    }
}

/// What a profile does with an excessive filter correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// Fail the measurement.
    #[default]
    Reject,
    /// Limit the correction (diagnostics only).
    Clamp,
}

impl From<Overflow> for CorrectionOverflow {
    fn from(o: Overflow) -> Self {
        match o {
            Overflow::Reject => CorrectionOverflow::Reject,
            Overflow::Clamp => CorrectionOverflow::Clamp,
        }
    }
}

impl From<CorrectionOverflow> for Overflow {
    fn from(o: CorrectionOverflow) -> Self {
        match o {
            CorrectionOverflow::Reject => Overflow::Reject,
            CorrectionOverflow::Clamp => Overflow::Clamp,
        }
    }
}

/// A named set of measurement options.
///
/// Profiles are stored as flat TOML files. Every key is optional; missing
/// keys take the kernel defaults.
///
/// # TOML Format
///
/// ```toml
/// name = "mb"
/// description = "Short-period body-wave magnitude"
/// filter_order = 3
/// zero_phase = false
/// low_cut_hz = 0.8
/// high_cut_hz = 4.5
/// threshold1 = 10.0
/// threshold4 = 1.5
/// use_single_reading = true
/// refinement = "cosine_with_fallback"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Butterworth order of the filter applied to the data (0 = none).
    pub filter_order: u32,
    /// Filter was run forward and backward.
    pub zero_phase: bool,
    /// High-pass corner in Hz (0 = unset).
    pub low_cut_hz: f64,
    /// Low-pass corner in Hz (0 = unset).
    pub high_cut_hz: f64,
    /// Cosine taper fraction used by the filter stage.
    pub taper_fraction: f64,

    /// Elimination threshold, %.
    pub threshold1: f64,
    /// Neighbour significance, %.
    pub threshold2: f64,
    /// Nyquist proximity, %.
    pub threshold3: f64,
    /// Reading agreement ratio.
    pub threshold4: f64,
    /// Detrend limit, %.
    pub threshold5: f64,
    /// Early-pair preference, %.
    pub threshold6: f64,

    /// Allowed factor above the high corner.
    pub allowed_hp_ratio: f64,
    /// Allowed factor below the low corner.
    pub allowed_lp_ratio: f64,
    /// Largest accepted filter correction.
    pub max_allowed_filter_correction: f64,

    /// Window start before the arrival, seconds.
    pub lead_seconds: f64,
    /// Window length, seconds.
    pub length_seconds: f64,
    /// Extra data the filter needs on each side, seconds.
    pub filter_margin_seconds: f64,

    /// Accept a period backed by a single half-period reading.
    pub use_single_reading: bool,
    /// Combine readings with the geometric instead of the arithmetic mean.
    pub use_geometric_mean: bool,
    /// Sub-sample fit.
    pub refinement: Refinement,
    /// Excessive correction policy.
    pub correction_overflow: Overflow,
}

impl Default for Profile {
    fn default() -> Self {
        Self::from_measure_config("default", &MeasureConfig::default())
    }
}

impl Profile {
    /// Create a profile with kernel defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a profile with a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the filter the data went through.
    pub fn with_filter(mut self, filter: FilterSpec) -> Self {
        self.filter_order = filter.order;
        self.zero_phase = filter.zero_phase;
        self.low_cut_hz = filter.low_cut_hz;
        self.high_cut_hz = filter.high_cut_hz;
        self
    }

    /// Capture an existing kernel configuration.
    pub fn from_measure_config(name: impl Into<String>, config: &MeasureConfig) -> Self {
        let t = &config.thresholds;
        Self {
            name: name.into(),
            description: None,
            filter_order: config.filter.order,
            zero_phase: config.filter.zero_phase,
            low_cut_hz: config.filter.low_cut_hz,
            high_cut_hz: config.filter.high_cut_hz,
            taper_fraction: config.taper_fraction,
            threshold1: t.threshold1,
            threshold2: t.threshold2,
            threshold3: t.threshold3,
            threshold4: t.threshold4,
            threshold5: t.threshold5,
            threshold6: t.threshold6,
            allowed_hp_ratio: config.allowed_hp_ratio,
            allowed_lp_ratio: config.allowed_lp_ratio,
            max_allowed_filter_correction: config.max_allowed_filter_correction,
            lead_seconds: config.lead_seconds,
            length_seconds: config.length_seconds,
            filter_margin_seconds: config.filter_margin_seconds,
            use_single_reading: !config.readings.require_multiple,
            use_geometric_mean: config.readings.combine == Combine::GeometricMean,
            refinement: config.refinement.into(),
            correction_overflow: config.correction_overflow.into(),
        }
    }

    /// The filter described by this profile.
    pub fn filter(&self) -> FilterSpec {
        FilterSpec {
            order: self.filter_order,
            zero_phase: self.zero_phase,
            low_cut_hz: self.low_cut_hz,
            high_cut_hz: self.high_cut_hz,
        }
    }

    /// Kernel configuration, without validation.
    ///
    /// Out-of-range thresholds are still clamped by the measurer.
    pub fn measure_config(&self) -> MeasureConfig {
        MeasureConfig {
            filter: self.filter(),
            taper_fraction: self.taper_fraction,
            thresholds: Thresholds {
                threshold1: self.threshold1,
                threshold2: self.threshold2,
                threshold3: self.threshold3,
                threshold4: self.threshold4,
                threshold5: self.threshold5,
                threshold6: self.threshold6,
            },
            allowed_hp_ratio: self.allowed_hp_ratio,
            allowed_lp_ratio: self.allowed_lp_ratio,
            max_allowed_filter_correction: self.max_allowed_filter_correction,
            lead_seconds: self.lead_seconds,
            length_seconds: self.length_seconds,
            filter_margin_seconds: self.filter_margin_seconds,
            refinement: self.refinement.into(),
            readings: ReadingPolicy {
                require_multiple: !self.use_single_reading,
                combine: if self.use_geometric_mean {
                    Combine::GeometricMean
                } else {
                    Combine::ArithmeticMean
                },
            },
            correction_overflow: self.correction_overflow.into(),
        }
    }

    /// Validate, then build the kernel configuration.
    pub fn to_measure_config(&self) -> Result<MeasureConfig, ConfigError> {
        validate_profile(self)?;
        Ok(self.measure_config())
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let profile: Profile = toml::from_str(&content)?;
        Ok(profile)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the profile to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_kernel_defaults() {
        let profile = Profile::default();
        assert_eq!(profile.measure_config(), MeasureConfig::default());
        assert!(profile.use_single_reading);
        assert!(!profile.use_geometric_mean);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let profile = Profile::from_toml(
            r#"
name = "tight"
threshold1 = 5
low_cut_hz = 1.0
"#,
        )
        .unwrap();
        assert_eq!(profile.name, "tight");
        assert_eq!(profile.threshold1, 5.0);
        assert_eq!(profile.low_cut_hz, 1.0);
        assert_eq!(profile.high_cut_hz, 4.5);
        assert_eq!(profile.threshold4, 1.5);
        assert_eq!(profile.refinement, Refinement::CosineWithFallback);
    }

    #[test]
    fn policy_flags_map_to_kernel() {
        let profile = Profile::from_toml(
            r#"
name = "strict"
use_single_reading = false
use_geometric_mean = true
refinement = "lagrange_only"
correction_overflow = "clamp"
"#,
        )
        .unwrap();
        let cfg = profile.measure_config();
        assert!(cfg.readings.require_multiple);
        assert_eq!(cfg.readings.combine, Combine::GeometricMean);
        assert_eq!(cfg.refinement, RefinementMode::LagrangeOnly);
        assert_eq!(cfg.correction_overflow, CorrectionOverflow::Clamp);
    }

    #[test]
    fn unknown_refinement_is_a_parse_error() {
        let err = Profile::from_toml("refinement = \"spline\"").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn toml_roundtrip_keeps_filter() {
        let profile = Profile::new("ml")
            .with_description("local")
            .with_filter(FilterSpec::bandpass(4, 2.0, 8.0).with_zero_phase(true));
        let parsed = Profile::from_toml(&profile.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, profile);
        assert_eq!(parsed.filter(), FilterSpec::bandpass(4, 2.0, 8.0).with_zero_phase(true));
    }

    #[test]
    fn to_measure_config_validates() {
        let mut profile = Profile::new("bad");
        profile.filter_order = 20;
        assert!(matches!(
            profile.to_measure_config(),
            Err(ConfigError::Validation(_))
        ));
    }
}
