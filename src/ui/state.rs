use wire3d::config::AppConfig;
use wire3d::mesh::{
    CanvasParameters, Extent, Resolution, RotationStrategy, SURFACE_PRESETS, SurfacePreset,
    Topology, find_preset,
};

use crate::renderer::CameraMode;

pub struct UiState {
    pub selected_preset: usize,

    pub nx: u32,
    pub ny: u32,
    pub topology: Topology,
    pub width: f32,
    pub height: f32,
    pub x_start: f32,
    pub y_start: f32,

    pub rotation_enabled: bool,
    pub angle_step: f32,
    pub strategy: RotationStrategy,

    pub camera_mode: CameraMode,
    pub vsync_enabled: bool,
    pub show_grid: bool,
    pub show_stats: bool,

    pub needs_regenerate: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl UiState {
    pub fn from_config(config: &AppConfig) -> Self {
        let selected_preset = find_preset(&config.viewer.preset)
            .and_then(|preset| SURFACE_PRESETS.iter().position(|p| p.name == preset.name))
            .unwrap_or(0);
        let canvas = &config.canvas;

        Self {
            selected_preset,

            nx: canvas.nx,
            ny: canvas.ny,
            topology: canvas.topology,
            width: canvas.width,
            height: canvas.height,
            x_start: canvas.x_start,
            y_start: canvas.y_start,

            rotation_enabled: config.rotation.enabled,
            angle_step: config.rotation.angle_step,
            strategy: config.rotation.strategy,

            camera_mode: CameraMode::Orbital,
            vsync_enabled: config.viewer.vsync,
            show_grid: true,
            show_stats: true,

            needs_regenerate: true,
        }
    }

    pub fn preset(&self) -> &'static SurfacePreset {
        &SURFACE_PRESETS[self.selected_preset.min(SURFACE_PRESETS.len() - 1)]
    }

    /// Selects a preset and takes over its grid, extent and topology.
    pub fn apply_preset(&mut self, index: usize) {
        let Some(preset) = SURFACE_PRESETS.get(index) else {
            return;
        };
        self.selected_preset = index;
        self.nx = preset.resolution.nx;
        self.ny = preset.resolution.ny;
        self.topology = preset.topology;
        self.width = preset.extent.width;
        self.height = preset.extent.height;
        self.x_start = preset.extent.x_start;
        self.y_start = preset.extent.y_start;
        self.needs_regenerate = true;
    }

    pub fn canvas_parameters(&self) -> CanvasParameters {
        CanvasParameters::new(
            Resolution::new(self.nx, self.ny),
            Extent::new(self.width, self.height, self.x_start, self.y_start),
            self.topology,
        )
    }
}
