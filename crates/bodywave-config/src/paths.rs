//! Platform-specific locations of user measurement profiles.
//!
//! - Linux: `~/.config/bodywave/profiles/`
//! - macOS: `~/Library/Application Support/bodywave/profiles/`
//! - Windows: `%APPDATA%\bodywave\profiles\`

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "bodywave";

/// Subdirectory name for profiles.
const PROFILES_SUBDIR: &str = "profiles";

/// Returns the user-specific profiles directory.
///
/// Falls back to `./bodywave/profiles` if the config directory cannot be
/// determined.
pub fn user_profiles_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PROFILES_SUBDIR)
}

/// Find a profile file by name or path.
///
/// `name` may be a path to a TOML file, or a profile name looked up (with
/// or without `.toml`) in `search_dirs`, in order.
pub fn find_profile_in<'a>(
    name: &str,
    search_dirs: impl IntoIterator<Item = &'a Path>,
) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    search_dirs
        .into_iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.is_file())
}

/// Find a profile file by name or path, searching the user profiles directory.
pub fn find_profile(name: &str) -> Option<PathBuf> {
    let user_dir = user_profiles_dir();
    find_profile_in(name, [user_dir.as_path()])
}

/// Ensure the user profiles directory exists.
pub fn ensure_user_profiles_dir() -> Result<PathBuf, crate::ConfigError> {
    let dir = user_profiles_dir();
    ensure_profiles_dir(&dir)?;
    Ok(dir)
}

/// Create `dir` and any missing parents. An existing directory is left alone.
pub fn ensure_profiles_dir(dir: &Path) -> Result<(), crate::ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| crate::ConfigError::create_dir(dir, e))?;
    }
    Ok(())
}

/// List all profile files in the user profiles directory.
///
/// Returns an empty vector if the directory doesn't exist or can't be read.
pub fn list_user_profiles() -> Vec<PathBuf> {
    list_profiles_in_dir(&user_profiles_dir())
}

/// List the `.toml` files in `dir`, sorted by path.
pub fn list_profiles_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut profiles: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    profiles.sort();
    profiles
}

/// Profile name from a file path (the file stem).
///
/// # Example
///
/// ```rust
/// use bodywave_config::paths::profile_name_from_path;
/// use std::path::Path;
///
/// let name = profile_name_from_path(Path::new("/path/to/regional_mb.toml"));
/// assert_eq!(name, Some("regional_mb".to_string()));
/// ```
pub fn profile_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn user_profiles_dir_is_namespaced() {
        let dir = user_profiles_dir();
        let dir_str = dir.to_string_lossy();
        assert!(dir_str.contains("bodywave"));
        assert!(dir_str.ends_with("profiles"));
    }

    #[test]
    fn find_by_path() {
        let temp_dir = TempDir::new().unwrap();
        let profile_path = temp_dir.path().join("test.toml");
        fs::write(&profile_path, "name = \"test\"").unwrap();

        let found = find_profile(profile_path.to_str().unwrap());
        assert_eq!(found, Some(profile_path));
    }

    #[test]
    fn find_by_name_adds_extension() {
        let temp_dir = TempDir::new().unwrap();
        let profile_path = temp_dir.path().join("regional.toml");
        fs::write(&profile_path, "name = \"regional\"").unwrap();

        let found = find_profile_in("regional", [temp_dir.path()]);
        assert_eq!(found, Some(profile_path.clone()));
        let found = find_profile_in("regional.toml", [temp_dir.path()]);
        assert_eq!(found, Some(profile_path));
    }

    #[test]
    fn find_not_found() {
        assert!(find_profile("nonexistent_profile_12345").is_none());
    }

    #[test]
    fn list_only_toml_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.toml"), "").unwrap();
        fs::write(temp_dir.path().join("a.toml"), "").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let profiles = list_profiles_in_dir(temp_dir.path());
        assert_eq!(profiles.len(), 2);
        assert_eq!(profile_name_from_path(&profiles[0]).as_deref(), Some("a"));
    }

    #[test]
    fn ensure_creates_nested_dir_once() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("bodywave").join("profiles");

        ensure_profiles_dir(&dir).unwrap();
        assert!(dir.is_dir());

        fs::write(dir.join("kept.toml"), "name = \"kept\"").unwrap();
        ensure_profiles_dir(&dir).unwrap();
        assert_eq!(list_profiles_in_dir(&dir).len(), 1);
    }

    #[test]
    fn ensure_fails_under_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("not_a_dir");
        fs::write(&file, "").unwrap();

        let err = ensure_profiles_dir(&file.join("profiles")).unwrap_err();
        assert!(matches!(err, crate::ConfigError::CreateDir { .. }));
    }

    #[test]
    fn list_nonexistent_dir_is_empty() {
        assert!(list_profiles_in_dir(Path::new("/nonexistent/path/12345")).is_empty());
    }
}
