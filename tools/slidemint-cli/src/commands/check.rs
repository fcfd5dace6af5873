//! Check configuration, credentials, profile, and fonts.

use slidemint_common::config::{config_file_path, AppConfig};
use slidemint_common::credentials::CredentialStore;
use slidemint_layout_core::fonts::FontSet;
use slidemint_project_model::profile::Profile;

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("SlideMint Check");
    println!("{}", "=".repeat(50));

    let config_path = config_file_path();
    if config_path.exists() {
        println!("[OK] Config: {}", config_path.display());
    } else {
        println!("[OK] Config: defaults ({} not found)", config_path.display());
    }
    println!("     Data dir: {}", config.data_dir.display());
    println!("     Models: {} / {} / {}", config.ai.text_model, config.ai.image_model, config.ai.analysis_model);

    let mut ready = true;

    match CredentialStore::standard().load() {
        Ok(Some(_)) => println!("[OK] API key available"),
        Ok(None) => {
            ready = false;
            println!("[WARN] No API key. Use `slidemint key set <KEY>`.");
        }
        Err(e) => {
            ready = false;
            println!("[FAIL] API key unreadable: {e}");
        }
    }

    match Profile::load(&config.profile_path()) {
        Ok(Some(profile)) => println!("[OK] Profile: {}", profile.username),
        Ok(None) => {
            ready = false;
            println!("[WARN] No profile; exports will be skipped. Use `slidemint profile set`.");
        }
        Err(e) => {
            ready = false;
            println!("[FAIL] Profile unreadable: {e}");
        }
    }

    match FontSet::load(
        config.export.regular_font.as_deref(),
        config.export.bold_font.as_deref(),
    ) {
        Ok(_) if config.export.regular_font.is_none() => {
            println!("[OK] Slide fonts: bundled DejaVu Sans")
        }
        Ok(_) => println!("[OK] Slide fonts loaded"),
        Err(e) => {
            ready = false;
            println!("[FAIL] {e}");
        }
    }

    println!();
    if ready {
        println!("SlideMint is ready.");
    } else {
        println!("Some checks need attention. See above for fixes.");
    }
    Ok(())
}
