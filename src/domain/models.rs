use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_category() -> String {
    "Plugin".to_string()
}

/// On-disk plugin manifest: `plugin.json` inside each plugin directory.
/// A plugin contributes one or more commands and, optionally, settings
/// that join the configuration store at load time.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PluginManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    pub commands: Vec<ManifestCommand>,
    #[serde(default)]
    pub settings: Vec<ManifestSetting>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestCommand {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub summary: String,
    pub synopsis: String,
    pub description: String,
    #[serde(default)]
    pub examples: Vec<ManifestExample>,
    pub run: ManifestRun,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestExample {
    pub invocation: String,
    pub effect: String,
}

/// Program executed for a plugin command. A relative `program` path is
/// resolved against the plugin directory.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestRun {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ManifestSetting {
    pub name: String,
    pub default: String,
    pub description: String,
}

/// Session snapshot written by `session save` and read by `session load`.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SessionFile {
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

/// Startup configuration file (`config.toml`): initial setting values and
/// alias definitions, applied through the same validators as `set`.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}
