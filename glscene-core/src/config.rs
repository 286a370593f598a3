/// Scene configuration loaded from TOML
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GlSceneError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            aspect: 1.333,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrthographicConfig {
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthographicConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clear_color: [f32; 4],
    pub projection: PerspectiveConfig,
    pub orthographic: OrthographicConfig,
    pub resources: Vec<ResourceEntry>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: [1.0, 1.0, 1.0, 0.0],
            projection: PerspectiveConfig::default(),
            orthographic: OrthographicConfig::default(),
            resources: Vec::new(),
        }
    }
}

impl SceneConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GlSceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
