//! Factory measurement profiles bundled with the library.
//!
//! These are always available without external files and cover the usual
//! magnitude bands. They also serve as templates for user profiles.

use crate::Profile;

/// Array of factory profile names for external access.
pub static FACTORY_PROFILE_NAMES: &[&str] = &["mb", "ml", "broadband"];

/// TOML content for factory profiles, embedded at compile time.
static FACTORY_PROFILES_TOML: &[(&str, &str)] = &[
    ("mb", MB_PROFILE),
    ("ml", ML_PROFILE),
    ("broadband", BROADBAND_PROFILE),
];

/// Short-period body-wave magnitude.
const MB_PROFILE: &str = r#"
name = "mb"
description = "Short-period body-wave magnitude: 0.8-4.5 Hz causal Butterworth, 5 s window"
filter_order = 3
zero_phase = false
low_cut_hz = 0.8
high_cut_hz = 4.5
taper_fraction = 0.05
lead_seconds = 0.5
length_seconds = 5.0
filter_margin_seconds = 10.0
"#;

/// Local magnitude.
const ML_PROFILE: &str = r#"
name = "ml"
description = "Local magnitude: 2-8 Hz zero-phase Butterworth, 10 s window"
filter_order = 3
zero_phase = true
low_cut_hz = 2.0
high_cut_hz = 8.0
taper_fraction = 0.05
lead_seconds = 1.0
length_seconds = 10.0
filter_margin_seconds = 10.0
"#;

/// Unfiltered data.
const BROADBAND_PROFILE: &str = r#"
name = "broadband"
description = "No filter applied: amplitudes are not corrected"
filter_order = 0
zero_phase = false
low_cut_hz = 0.0
high_cut_hz = 0.0
taper_fraction = 0.0
lead_seconds = 0.5
length_seconds = 5.0
filter_margin_seconds = 0.0
"#;

/// All factory profiles.
pub fn factory_profiles() -> Vec<Profile> {
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(_, toml)| Profile::from_toml(toml).ok())
        .collect()
}

/// A factory profile by name.
pub fn get_factory_profile(name: &str) -> Option<Profile> {
    FACTORY_PROFILES_TOML
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .and_then(|(_, toml)| Profile::from_toml(toml).ok())
}

/// Names of all factory profiles.
pub fn factory_profile_names() -> &'static [&'static str] {
    FACTORY_PROFILE_NAMES
}

/// True if `name` is a factory profile.
pub fn is_factory_profile(name: &str) -> bool {
    FACTORY_PROFILE_NAMES
        .iter()
        .any(|n| n.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_profile;
    use bodywave_core::{Band, FilterSpec};

    #[test]
    fn all_factory_profiles_parse_and_validate() {
        let profiles = factory_profiles();
        assert_eq!(profiles.len(), FACTORY_PROFILE_NAMES.len());
        for profile in &profiles {
            validate_profile(profile)
                .unwrap_or_else(|e| panic!("profile '{}' invalid: {e}", profile.name));
        }
    }

    #[test]
    fn names_match_content() {
        for name in FACTORY_PROFILE_NAMES {
            let profile = get_factory_profile(name).unwrap();
            assert_eq!(profile.name, *name);
        }
    }

    #[test]
    fn mb_is_short_period_band() {
        let mb = get_factory_profile("MB").unwrap();
        assert_eq!(mb.filter(), FilterSpec::bandpass(3, 0.8, 4.5));
        assert_eq!(mb.measure_config(), bodywave_core::MeasureConfig::default());
    }

    #[test]
    fn ml_is_zero_phase() {
        let ml = get_factory_profile("ml").unwrap();
        assert!(ml.zero_phase);
        assert_eq!(
            ml.filter().band(),
            Band::Bandpass {
                low_hz: 2.0,
                high_hz: 8.0
            }
        );
    }

    #[test]
    fn broadband_has_no_filter() {
        let bb = get_factory_profile("broadband").unwrap();
        assert!(!bb.filter().is_active());
    }

    #[test]
    fn unknown_profile() {
        assert!(get_factory_profile("teleseismic").is_none());
        assert!(!is_factory_profile("teleseismic"));
        assert!(is_factory_profile("ML"));
    }
}
