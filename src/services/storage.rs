//! Local persistence: session snapshots, the startup configuration
//! file, and the best-effort audit log.

use std::path::{Path, PathBuf};

use crate::domain::models::{ConfigFile, SessionFile};

/// `$HOME/.config/husk`, when a home directory is known.
pub fn config_dir() -> Option<PathBuf> {
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config").join("husk"))
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(config_dir()?.join("config.toml"))
}

pub fn default_plugins_dir() -> Option<PathBuf> {
    Some(config_dir()?.join("plugins"))
}

/// Append one dispatch event to the audit log. Best-effort: failures
/// never disturb the console loop.
pub fn audit(command: &str, code: i32) {
    let Some(dir) = config_dir() else {
        return;
    };
    let path = dir.join("audit.jsonl");
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": epoch_seconds(),
        "command": command,
        "code": code,
    });
    let line = format!("{event}\n");
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

fn epoch_seconds() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub fn load_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    let raw = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&raw)?)
}

pub fn load_session(path: &Path) -> anyhow::Result<SessionFile> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub fn save_session(path: &Path, session: &SessionFile) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}
