//! Profile listing command.

use bodywave_config::{
    Profile, ensure_user_profiles_dir, factory_profiles, get_factory_profile, list_user_profiles,
    load_profile, profile_name_from_path, user_profiles_dir,
};
use clap::Args;

/// List measurement profiles, print one as TOML, or copy a factory profile.
#[derive(Args)]
pub struct ProfilesArgs {
    /// Print the named profile (or profile file) as TOML
    #[arg(long, value_name = "NAME", conflicts_with = "copy")]
    show: Option<String>,

    /// Copy a factory profile into the user profiles directory for editing
    #[arg(long, value_name = "SOURCE")]
    copy: Option<String>,

    /// Name of the copy (defaults to the source name)
    #[arg(long = "as", value_name = "NAME", requires = "copy")]
    copy_as: Option<String>,
}

fn copy_profile(source: &str, new_name: Option<&str>) -> anyhow::Result<()> {
    let mut profile = get_factory_profile(source)
        .ok_or_else(|| anyhow::anyhow!("Factory profile '{}' not found.", source))?;
    let target_name = new_name.unwrap_or(source);

    let dir = ensure_user_profiles_dir()?;
    let path = dir.join(format!("{target_name}.toml"));
    if path.exists() {
        anyhow::bail!(
            "Profile '{}' already exists in user profiles. Choose a different name with --as.",
            target_name
        );
    }

    profile.name = target_name.to_string();
    if let Some(desc) = profile.description.take() {
        profile.description = Some(format!("{desc} (copy)"));
    }
    profile.save(&path)?;

    println!("Copied '{}' to {}", source, path.display());
    Ok(())
}

fn print_profile_line(profile: &Profile) {
    let filter = profile.filter();
    let band = if filter.is_active() {
        format!(
            "order {} {} {:.2}-{:.2} Hz",
            filter.order,
            if filter.zero_phase { "zero-phase" } else { "causal" },
            filter.low_cut_hz,
            filter.high_cut_hz
        )
    } else {
        "unfiltered".to_string()
    };
    println!("  {:<12} {}", profile.name, band);
    if let Some(desc) = &profile.description {
        println!("  {:<12} {}", "", desc);
    }
}

/// Run the profiles command.
pub fn run(args: ProfilesArgs) -> anyhow::Result<()> {
    if let Some(source) = &args.copy {
        return copy_profile(source, args.copy_as.as_deref());
    }
    if let Some(name) = args.show {
        let profile = load_profile(&name).map_err(|e| anyhow::anyhow!("{}", e))?;
        print!("{}", profile.to_toml()?);
        return Ok(());
    }

    println!("Factory profiles:");
    for profile in factory_profiles() {
        print_profile_line(&profile);
    }

    let user = list_user_profiles();
    println!();
    println!("User profiles ({}):", user_profiles_dir().display());
    if user.is_empty() {
        println!("  (none)");
    }
    for path in user {
        match Profile::load(&path) {
            Ok(profile) => print_profile_line(&profile),
            Err(e) => println!(
                "  {:<12} unreadable: {}",
                profile_name_from_path(&path).unwrap_or_default(),
                e
            ),
        }
    }
    Ok(())
}
