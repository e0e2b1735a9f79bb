use std::fs;
use std::path::PathBuf;

use crate::config::ClientConfig;
use crate::session::{FileSessionStore, SessionState};

const SESSION_FILE: &str = "session.json";

pub fn get_config_dir(config: &ClientConfig) -> anyhow::Result<PathBuf> {
    let config_dir = match &config.session.config_dir {
        Some(custom_dir) => custom_dir.clone(),
        None => {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("watch-store")
        }
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn session_file(config: &ClientConfig) -> anyhow::Result<PathBuf> {
    Ok(get_config_dir(config)?.join(SESSION_FILE))
}

/// Session restored from session.json, written back on every change
pub fn load_session(config: &ClientConfig) -> anyhow::Result<SessionState> {
    let path = session_file(config)?;
    let state = SessionState::load(FileSessionStore::new(&path))
        .map_err(|e| anyhow::anyhow!("Failed to read session from {}: {}", path.display(), e))?;
    Ok(state)
}
