pub mod camera;
pub mod gpu;
pub mod wireframe;

pub use camera::{Camera, CameraMode};
pub use gpu::{GpuError, GpuState};
pub use wireframe::generate_grid_vertices;
