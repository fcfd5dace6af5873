//! Manage the branding profile.

use slidemint_common::config::AppConfig;
use slidemint_project_model::image_data::ImageData;
use slidemint_project_model::profile::Profile;

use crate::ProfileAction;

pub fn run(config: &AppConfig, action: ProfileAction) -> anyhow::Result<()> {
    let path = config.profile_path();
    match action {
        ProfileAction::Set { username, avatar } => {
            let picture = ImageData::from_file(&avatar)
                .map_err(|e| anyhow::anyhow!("Failed to read avatar: {e}"))?;
            let profile = Profile::new(username, picture)
                .map_err(|e| anyhow::anyhow!("Invalid profile: {e}"))?;
            profile
                .save(&path)
                .map_err(|e| anyhow::anyhow!("Failed to save profile: {e}"))?;
            println!("Profile saved: {}", path.display());
            println!("  Username: {}", profile.username);
            println!(
                "  Avatar: {} ({} bytes)",
                profile.profile_pic.mime_type(),
                profile.profile_pic.len()
            );
        }
        ProfileAction::Show => match Profile::load(&path)
            .map_err(|e| anyhow::anyhow!("Failed to load profile: {e}"))?
        {
            Some(profile) => {
                println!("Profile: {}", path.display());
                println!("  Username: {}", profile.username);
                println!(
                    "  Avatar: {} ({} bytes)",
                    profile.profile_pic.mime_type(),
                    profile.profile_pic.len()
                );
            }
            None => println!("No profile set. Use `slidemint profile set`."),
        },
    }
    Ok(())
}
