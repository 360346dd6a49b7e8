use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "oubliette.toml";

#[derive(Debug)]
pub enum ConfigLoadError {
    NotFound,
    ParseError(String),
    IoError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::NotFound => write!(
                f,
                "No \"{CONFIG_FILE_NAME}\" found; run this command from a mod project directory \
                 or create one with \"oubliette init\""
            ),
            ConfigLoadError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigLoadError::IoError(msg) => write!(f, "IO error reading config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    #[serde(default = "default_source_dir")]
    pub source_dir: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Directory holding the vendored runtime support files, including
    /// the custom-stage metadata target.
    #[serde(default = "default_runtime_dir")]
    pub runtime_dir: String,
}

fn default_source_dir() -> String {
    "src".to_string()
}

fn default_output_dir() -> String {
    "mod".to_string()
}

fn default_runtime_dir() -> String {
    "runtime".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            runtime_dir: default_runtime_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranspilerSection {
    #[serde(default = "default_transpiler_command")]
    pub command: String,
    #[serde(default = "default_transpiler_args")]
    pub args: Vec<String>,
    /// Oldest transpiler version the project supports. Checked against
    /// `<command> --version` before every build when set.
    #[serde(default)]
    pub min_version: Option<String>,
}

fn default_transpiler_command() -> String {
    "tl".to_string()
}

fn default_transpiler_args() -> Vec<String> {
    vec!["build".to_string()]
}

impl Default for TranspilerSection {
    fn default() -> Self {
        Self {
            command: default_transpiler_command(),
            args: default_transpiler_args(),
            min_version: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchSection {
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,
}

fn default_scan_interval_ms() -> u64 {
    1000
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            scan_interval_ms: default_scan_interval_ms(),
        }
    }
}

/// One boss-pool entry of a custom stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossPoolConfig {
    pub name: String,
    pub sub_type: u32,
    #[serde(default = "default_weight")]
    pub weight: f32,
}

fn default_weight() -> f32 {
    1.0
}

/// One custom stage, pointing at the XML file holding its rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    pub xml_path: String,
    pub room_variant_prefix: u32,
    #[serde(default)]
    pub base_stage: Option<i32>,
    #[serde(default)]
    pub base_stage_type: Option<i32>,
    #[serde(default)]
    pub boss_pool: Vec<BossPoolConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintSection {
    /// Path to the game's enum dump, for the enum-member-style rule.
    #[serde(default)]
    pub enum_definitions: Option<String>,
    /// Per-rule switches, keyed by rule id.
    #[serde(default)]
    pub rules: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub transpiler: TranspilerSection,
    #[serde(default)]
    pub watch: WatchSection,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub lint: LintSection,
}

impl ProjectConfig {
    pub fn config_path(project_root: &Path) -> PathBuf {
        project_root.join(CONFIG_FILE_NAME)
    }

    pub fn load(project_root: &Path) -> Result<Self, ConfigLoadError> {
        let path = Self::config_path(project_root);

        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }

        let content =
            fs::read_to_string(&path).map_err(|e| ConfigLoadError::IoError(e.to_string()))?;
        let config =
            toml::from_str(&content).map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, project_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path(project_root);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self)?;
        fs::write(&path, content)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}
