//! Viewer configuration.
//!
//! Everything has a default, so an empty TOML document is a valid config:
//!
//! ```toml
//! default_model = "3D_Models/high_poly_plague_knight.glb"
//! assets_dir = "assets"
//!
//! [capabilities]
//! normal_material = true
//!
//! [lighting]
//! exposure = 1.0
//! shadow_intensity = 1.0
//! light_intensity = 1.0
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{
    error::ViewerError, lighting::LightingDefaults, render_mode::RenderCapabilities,
    session::ModelSource,
};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Preset loaded when the viewer starts.
    pub default_model: String,
    /// Base directory for relative model paths on native targets.
    pub assets_dir: PathBuf,
    pub capabilities: RenderCapabilities,
    pub lighting: LightingDefaults,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_model: "3D_Models/high_poly_plague_knight.glb".to_string(),
            assets_dir: PathBuf::from("assets"),
            capabilities: RenderCapabilities::default(),
            lighting: LightingDefaults::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ViewerError> {
        toml::from_str(content)
            .map_err(|e| ViewerError::Config(format!("Failed to parse config: {}", e)))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ViewerError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn default_source(&self) -> ModelSource {
        ModelSource::preset(self.default_model.clone())
    }
}
