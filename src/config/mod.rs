use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::view::{Filter, MarkerStyle, ViewOptions};

/// Bounding box used when none is configured: a 240 x 240 square inset in
/// the default 500 x 300 surface.
pub const DEFAULT_BBOX: [[f64; 2]; 4] = [[130.0, 30.0], [370.0, 30.0], [370.0, 270.0], [130.0, 270.0]];

fn default_name() -> String {
    "Points".to_string()
}
fn default_bbox() -> Vec<[f64; 2]> {
    DEFAULT_BBOX.to_vec()
}
fn default_data() -> String {
    "data.json".to_string()
}
fn default_width() -> u32 {
    500
}
fn default_height() -> u32 {
    300
}
fn default_selector() -> String {
    "#map".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Four `[x, y]` vertices. The count is checked when the model is built.
    #[serde(default = "default_bbox")]
    pub bbox: Vec<[f64; 2]>,
    /// URL or file path of the point records
    #[serde(default = "default_data")]
    pub data: String,
    #[serde(default = "default_selector")]
    pub selector: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub filter: Filter,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub marker: MarkerStyle,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            bbox: default_bbox(),
            data: default_data(),
            selector: default_selector(),
            width: default_width(),
            height: default_height(),
            output: None,
            filter: Filter::default(),
            timeout_secs: default_timeout_secs(),
            verbose: false,
            marker: MarkerStyle::default(),
        }
    }
}

impl FileConfig {
    /// First config file found on the search path.
    ///
    /// A file that exists but fails to read or parse is an error rather than
    /// a silent fall back to defaults.
    pub fn load() -> anyhow::Result<Option<Self>> {
        Self::load_from(&get_config_paths())
    }

    pub fn load_from(paths: &[PathBuf]) -> anyhow::Result<Option<Self>> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::from_path(path)?;
                tracing::debug!(path = %path.display(), "loaded config file");
                Ok(Some(config))
            }
            None => Ok(None),
        }
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn view_options(&self) -> ViewOptions {
        ViewOptions {
            width: self.width,
            height: self.height,
            marker: self.marker.clone(),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("pointmap.toml"));
    paths.push(PathBuf::from(".pointmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("pointmap").join("config.toml"));
        paths.push(config_dir.join("pointmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".pointmap.toml"));
    }

    paths
}
