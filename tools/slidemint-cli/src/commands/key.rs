//! Manage the Gemini API key.

use slidemint_common::credentials::{CredentialStore, API_KEY_ENV};

use crate::KeyAction;

pub fn run(action: KeyAction) -> anyhow::Result<()> {
    let store = CredentialStore::standard();
    match action {
        KeyAction::Set { key } => {
            store.save(&key)?;
            println!("API key stored at {}", store.path().display());
        }
        KeyAction::Clear => {
            store.clear()?;
            println!("API key removed");
        }
        KeyAction::Status => {
            let from_env = std::env::var(API_KEY_ENV)
                .map(|v| !v.trim().is_empty())
                .unwrap_or(false);
            match store.load()? {
                Some(key) => {
                    let source = if from_env {
                        format!("${API_KEY_ENV}")
                    } else {
                        store.path().display().to_string()
                    };
                    println!("[OK] API key available from {source} ({})", mask(&key));
                }
                None => println!("[WARN] No API key. Use `slidemint key set <KEY>`."),
            }
        }
    }
    Ok(())
}

fn mask(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("…{tail}")
}
