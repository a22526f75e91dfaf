use crate::mesh::canvas::{CanvasParameters, Extent, Resolution};
use crate::mesh::topology::Topology;

pub type SurfaceFn = fn(f32, f32) -> f32;

pub struct SurfacePreset {
    pub name: &'static str,
    pub description: &'static str,
    pub surface: SurfaceFn,
    pub extent: Extent,
    pub resolution: Resolution,
    pub topology: Topology,
}

impl SurfacePreset {
    pub fn parameters(&self) -> CanvasParameters {
        CanvasParameters::new(self.resolution, self.extent, self.topology)
    }
}

fn elliptic_paraboloid(x: f32, y: f32) -> f32 {
    x * x + 2.0 * y * y - 2.0
}

fn sine_wave(x: f32, y: f32) -> f32 {
    x.sin() + y.sin()
}

fn ripple(x: f32, y: f32) -> f32 {
    let r = (x * x + y * y).sqrt();
    (r * 2.0).sin() / (r + 1.0)
}

fn saddle(x: f32, y: f32) -> f32 {
    x * x - y * y
}

fn peaks(x: f32, y: f32) -> f32 {
    let t1 = 3.0 * (1.0 - x) * (1.0 - x) * (-x * x - (y + 1.0) * (y + 1.0)).exp();
    let t2 = -10.0 * (x / 5.0 - x * x * x - y.powi(5)) * (-x * x - y * y).exp();
    let t3 = -1.0 / 3.0 * (-(x + 1.0) * (x + 1.0) - y * y).exp();
    t1 + t2 + t3
}

fn flat_plane(_x: f32, _y: f32) -> f32 {
    0.0
}

pub const SURFACE_PRESETS: &[SurfacePreset] = &[
    SurfacePreset {
        name: "Elliptic Paraboloid",
        description: "x² + 2y² - 2",
        surface: elliptic_paraboloid,
        extent: Extent::new(2.0, 2.0, -1.0, -1.0),
        resolution: Resolution::new(64, 64),
        topology: Topology::PlanarSquare,
    },
    SurfacePreset {
        name: "Sine Wave",
        description: "sin(x) + sin(y), one period per axis",
        surface: sine_wave,
        extent: Extent::new(6.28, 6.28, -3.14, -3.14),
        resolution: Resolution::new(64, 64),
        topology: Topology::PlanarSquare,
    },
    SurfacePreset {
        name: "Ripple",
        description: "Radial wave pattern",
        surface: ripple,
        extent: Extent::new(10.0, 10.0, -5.0, -5.0),
        resolution: Resolution::new(96, 96),
        topology: Topology::PlanarTriangle,
    },
    SurfacePreset {
        name: "Saddle",
        description: "x² - y²",
        surface: saddle,
        extent: Extent::new(6.0, 6.0, -3.0, -3.0),
        resolution: Resolution::new(48, 48),
        topology: Topology::PlanarSquare,
    },
    SurfacePreset {
        name: "Peaks",
        description: "Multiple gaussian bumps",
        surface: peaks,
        extent: Extent::new(6.0, 6.0, -3.0, -3.0),
        resolution: Resolution::new(80, 80),
        topology: Topology::PlanarTriangle,
    },
    SurfacePreset {
        name: "Flat Plane",
        description: "z = 0",
        surface: flat_plane,
        extent: Extent::new(2.0, 2.0, -1.0, -1.0),
        resolution: Resolution::new(16, 16),
        topology: Topology::PlanarSquare,
    },
];

/// Looks a preset up by name, ignoring case and surrounding whitespace.
pub fn find_preset(name: &str) -> Option<&'static SurfacePreset> {
    let name = name.trim();
    SURFACE_PRESETS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}
