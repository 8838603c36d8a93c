//! Measurement profiles for the bodywave amplitude/period kernel.
//!
//! A [`Profile`] is a named, TOML-backed set of every option the kernel
//! takes: the filter the data went through, the six thresholds, the band and
//! correction limits, the window timing and the reading policy. Profiles are
//! validated here and turned into a [`bodywave_core::MeasureConfig`].
//!
//! # Features
//!
//! - **Profiles**: load and save measurement profiles as TOML
//! - **Validation**: reject impossible filters, negative durations, NaNs
//! - **Factory Profiles**: built-in `mb`, `ml` and `broadband` profiles
//! - **Paths**: platform-specific user profile directory
//!
//! # Example
//!
//! ```rust
//! use bodywave_config::{Profile, get_factory_profile};
//!
//! let mut profile = get_factory_profile("mb").unwrap();
//! profile.threshold1 = 5.0;
//!
//! let toml = profile.to_toml().unwrap();
//! let parsed = Profile::from_toml(&toml).unwrap();
//! let config = parsed.to_measure_config().unwrap();
//! assert_eq!(config.thresholds.threshold1, 5.0);
//! ```

mod error;
mod profile;

/// Platform-specific paths for profiles.
#[cfg(feature = "std")]
pub mod paths;

/// Profile validation.
pub mod validation;

/// Factory profiles bundled with the library.
pub mod factory_profiles;

pub use error::ConfigError;
pub use factory_profiles::{
    FACTORY_PROFILE_NAMES, factory_profile_names, factory_profiles, get_factory_profile,
    is_factory_profile,
};
#[cfg(feature = "std")]
pub use paths::{
    ensure_profiles_dir, ensure_user_profiles_dir, find_profile, find_profile_in,
    list_profiles_in_dir, list_user_profiles, profile_name_from_path, user_profiles_dir,
};
pub use profile::{Overflow, Profile, Refinement};
pub use validation::{ValidationError, ValidationResult, validate_profile};

/// Load a profile by name or path.
///
/// Factory profiles win over files; otherwise `name` is resolved with
/// [`find_profile`].
#[cfg(feature = "std")]
pub fn load_profile(name: &str) -> Result<Profile, ConfigError> {
    if let Some(profile) = get_factory_profile(name) {
        return Ok(profile);
    }
    match find_profile(name) {
        Some(path) => Profile::load(path),
        None => Err(ConfigError::ProfileNotFound(name.to_string())),
    }
}
