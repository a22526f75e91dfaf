//! `wire3d.toml` loading.
//!
//! Every field has a default, so a partial file (or no file at all) is valid.
//! Command-line overrides are applied on top with [`AppConfig::apply`] and the
//! result is checked once with [`AppConfig::validate`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::mesh::{
    CanvasParameters, Extent, MAX_HEIGHT, MAX_WIDTH, Resolution, RotationStrategy, Topology,
    find_preset,
};

pub const DEFAULT_CONFIG_FILE: &str = "wire3d.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub nx: u32,
    pub ny: u32,
    pub width: f32,
    pub height: f32,
    pub x_start: f32,
    pub y_start: f32,
    pub topology: Topology,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            nx: 64,
            ny: 64,
            width: 2.0,
            height: 2.0,
            x_start: -1.0,
            y_start: -1.0,
            topology: Topology::PlanarSquare,
        }
    }
}

impl CanvasConfig {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.nx, self.ny)
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height, self.x_start, self.y_start)
    }

    pub fn to_parameters(&self) -> CanvasParameters {
        CanvasParameters::new(self.resolution(), self.extent(), self.topology)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Radians per frame.
    pub angle_step: f32,
    pub strategy: RotationStrategy,
    pub enabled: bool,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            angle_step: 0.01,
            strategy: RotationStrategy::SmallAngle,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub vsync: bool,
    pub preset: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            title: "wire3d".to_string(),
            vsync: true,
            preset: "Elliptic Paraboloid".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    pub rotation: RotationConfig,
    pub viewer: ViewerConfig,
}

/// Values given on the command line, each replacing its config counterpart.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub preset: Option<String>,
    pub nx: Option<u32>,
    pub ny: Option<u32>,
    pub topology: Option<Topology>,
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Reads `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(source) => Self::from_toml_str(&source),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// A preset override also takes the preset's own grid and extent; explicit
    /// `nx`/`ny`/`topology` overrides are applied after that.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), ConfigError> {
        if let Some(name) = &overrides.preset {
            let preset = find_preset(name)
                .ok_or_else(|| ConfigError::Invalid(format!("unknown preset `{name}`")))?;
            self.viewer.preset = preset.name.to_string();
            self.canvas = CanvasConfig {
                nx: preset.resolution.nx,
                ny: preset.resolution.ny,
                width: preset.extent.width,
                height: preset.extent.height,
                x_start: preset.extent.x_start,
                y_start: preset.extent.y_start,
                topology: preset.topology,
            };
        }
        if let Some(nx) = overrides.nx {
            self.canvas.nx = nx;
        }
        if let Some(ny) = overrides.ny {
            self.canvas.ny = ny;
        }
        if let Some(topology) = overrides.topology {
            self.canvas.topology = topology;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let CanvasConfig { nx, ny, .. } = self.canvas;
        if !(2..=MAX_WIDTH).contains(&nx) || !(2..=MAX_HEIGHT).contains(&ny) {
            return Err(ConfigError::Invalid(format!(
                "canvas {nx}x{ny} outside 2..={MAX_WIDTH} x 2..={MAX_HEIGHT}"
            )));
        }
        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return Err(ConfigError::Invalid(
                "canvas width and height must be positive".to_string(),
            ));
        }
        if !self.rotation.angle_step.is_finite() {
            return Err(ConfigError::Invalid(
                "rotation angle_step must be finite".to_string(),
            ));
        }
        if find_preset(&self.viewer.preset).is_none() {
            return Err(ConfigError::Invalid(format!(
                "unknown preset `{}`",
                self.viewer.preset
            )));
        }
        Ok(())
    }
}
