use log::{debug, warn};

use crate::mesh::buffers::{FixedBuffers, Region};
use crate::mesh::canvas::{Canvas, CanvasParameters};
use crate::mesh::error::{MeshError, MeshResult};
use crate::mesh::rotation::{RotationState, RotationStrategy};
use crate::mesh::sampler::{Surface, sample_vertices};
use crate::mesh::topology::Topology;
use crate::mesh::wireframe::{generate_indices, segment_count};

/// Owns the fixed buffers, the active canvas and the rotation state.
///
/// Everything that mutates takes `&mut self`; a context is meant to live on a
/// single thread (see [`MeshEngine`](crate::mesh::MeshEngine) for the
/// threaded host).
pub struct MeshContext {
    buffers: FixedBuffers,
    canvas: Canvas,
    rotation: RotationState,
}

impl Default for MeshContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshContext {
    /// Context with storage for the default maximum grid.
    pub fn new() -> Self {
        Self::with_buffers(FixedBuffers::new())
    }

    pub fn with_grid_limit(max_width: u32, max_height: u32) -> Self {
        Self::with_buffers(FixedBuffers::with_grid_limit(max_width, max_height))
    }

    fn with_buffers(buffers: FixedBuffers) -> Self {
        Self {
            buffers,
            canvas: Canvas::default(),
            rotation: RotationState::default(),
        }
    }

    /// Replaces the canvas with one built from `params` and rebinds both
    /// regions. The buffers keep whatever they held before.
    pub fn init_canvas(&mut self, params: &CanvasParameters) -> MeshResult<()> {
        let mut canvas = Canvas::from_parameters(params);
        canvas.reset_mesh(&self.buffers)?;
        canvas.reset_indices(&self.buffers)?;
        self.canvas = canvas;
        Ok(())
    }

    /// Recomputes the vertex sizes of the current canvas and rebinds its
    /// vertex region without resampling.
    pub fn reset_mesh(&mut self) -> MeshResult<()> {
        self.canvas.reset_mesh(&self.buffers)
    }

    /// Recomputes the index count of the current canvas and rebinds its index
    /// region without regenerating.
    pub fn reset_indices(&mut self) -> MeshResult<()> {
        self.canvas.reset_indices(&self.buffers)
    }

    /// Resets the canvas to `params`, samples `surface` into the vertex buffer
    /// and fills the index buffer with the topology's segments.
    ///
    /// All checks run before either buffer is touched, so on error the
    /// previous canvas and buffer contents are left as they were.
    ///
    /// The index region ends up bound to the indices actually written. For
    /// every topology but the planar triangle this equals the calculator
    /// count; the planar triangle emits one more segment than its formula
    /// allows for.
    pub fn generate<S>(&mut self, params: &CanvasParameters, surface: &S) -> MeshResult<()>
    where
        S: Surface + ?Sized,
    {
        let Some(topology) = Topology::from_code(params.topology) else {
            warn!("rejecting canvas: unknown topology code {}", params.topology);
            return Err(MeshError::UnknownTopology(params.topology));
        };

        let mut canvas = Canvas::from_parameters(params);
        canvas.reset_mesh(&self.buffers).inspect_err(|e| warn!("rejecting canvas: {e}"))?;
        canvas.reset_indices(&self.buffers).inspect_err(|e| warn!("rejecting canvas: {e}"))?;

        let emitted = 2 * segment_count(canvas.resolution, topology);
        let index_region = self
            .buffers
            .bind_indices(emitted)
            .inspect_err(|e| warn!("rejecting canvas: {e}"))?;

        sample_vertices(
            self.buffers.vertices_mut(canvas.vertices),
            canvas.resolution,
            canvas.extent,
            surface,
        );
        let written = generate_indices(
            self.buffers.indices_mut(index_region),
            canvas.resolution,
            topology,
        );

        if written != canvas.index_count {
            warn!(
                "{topology}: generator wrote {written} indices, calculator sized {}",
                canvas.index_count
            );
        }
        canvas.indices = Region { offset: 0, len: written };

        debug!(
            "generated {topology} {}x{}: {} vertices, {} segments",
            canvas.resolution.nx,
            canvas.resolution.ny,
            canvas.vertex_count,
            canvas.segment_count()
        );
        self.canvas = canvas;
        Ok(())
    }

    pub fn set_rotation_angle(&mut self, angle: f32) {
        self.rotation.set_angle(angle);
    }

    pub fn set_rotation_strategy(&mut self, strategy: RotationStrategy) {
        self.rotation.set_strategy(strategy);
    }

    /// Rotates every vertex of the canvas by the current step angle.
    pub fn rotate(&mut self) {
        let region = self.canvas.vertices;
        self.rotation
            .apply(self.buffers.vertices_mut(region), self.canvas.vertex_count);
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Vertex floats of the current canvas.
    pub fn vertices(&self) -> &[f32] {
        self.buffers.vertices(self.canvas.vertices)
    }

    /// Index pairs of the current canvas.
    pub fn indices(&self) -> &[u32] {
        self.buffers.indices(self.canvas.indices)
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices())
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.indices())
    }

    /// Base address of the vertex storage. Stays fixed for the lifetime of
    /// the context.
    pub fn vertex_buffer_ptr(&self) -> *const f32 {
        self.buffers.vertex_storage().as_ptr()
    }

    /// Base address of the index storage.
    pub fn index_buffer_ptr(&self) -> *const u32 {
        self.buffers.index_storage().as_ptr()
    }

    pub fn vertex_buffer_len(&self) -> usize {
        self.canvas.vertices.len
    }

    pub fn index_buffer_len(&self) -> usize {
        self.canvas.indices.len
    }

    /// Smallest and largest z over the canvas, `None` before anything was
    /// sampled.
    pub fn z_range(&self) -> Option<(f32, f32)> {
        self.vertices()
            .chunks_exact(3)
            .map(|v| v[2])
            .filter(|z| z.is_finite())
            .fold(None, |range, z| match range {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }
}
