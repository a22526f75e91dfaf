pub mod buffers;
pub mod canvas;
pub mod context;
pub mod engine;
pub mod error;
pub mod rotation;
pub mod sampler;
pub mod surfaces;
pub mod topology;
pub mod wireframe;

pub use buffers::{FixedBuffers, MAX_HEIGHT, MAX_WIDTH, Region};
pub use canvas::{Canvas, CanvasParameters, Extent, Resolution};
pub use context::MeshContext;
pub use engine::{MeshEngine, MeshEvent, MeshSnapshot};
pub use error::{BufferKind, MeshError, MeshResult};
pub use rotation::{RotationState, RotationStrategy, rotate_all};
pub use sampler::{Surface, sample_vertices};
pub use surfaces::{SURFACE_PRESETS, SurfacePreset, find_preset};
pub use topology::{Topology, compute_index_size};
pub use wireframe::{generate_indices, generate_planar_indices};
