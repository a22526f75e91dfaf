//! Canvas: the grid being sampled and the buffer regions it occupies.

use log::debug;

use crate::mesh::buffers::{FixedBuffers, Region};
use crate::mesh::error::{MeshError, MeshResult};
use crate::mesh::topology::{Topology, compute_index_size};

/// Number of samples along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub nx: u32,
    pub ny: u32,
}

impl Resolution {
    pub const fn new(nx: u32, ny: u32) -> Self {
        Self { nx, ny }
    }

    pub fn vertex_count(&self) -> usize {
        self.nx as usize * self.ny as usize
    }

    /// A grid needs two samples per axis to have a step size.
    pub fn is_degenerate(&self) -> bool {
        self.nx < 2 || self.ny < 2
    }
}

/// Physical rectangle covered by the grid. `x_start`/`y_start` is the
/// lower-left sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
    pub x_start: f32,
    pub y_start: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32, x_start: f32, y_start: f32) -> Self {
        Self {
            width,
            height,
            x_start,
            y_start,
        }
    }

    /// Spacing between neighbouring samples on each axis.
    pub fn step(&self, resolution: Resolution) -> (f32, f32) {
        (
            self.width / (resolution.nx - 1) as f32,
            self.height / (resolution.ny - 1) as f32,
        )
    }
}

/// Parameters a host hands over to (re)initialize a canvas, by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasParameters {
    pub nx: u32,
    pub ny: u32,
    pub width: f32,
    pub height: f32,
    pub x_start: f32,
    pub y_start: f32,
    /// Raw topology code, see [`Topology::code`].
    pub topology: u32,
}

impl CanvasParameters {
    pub fn new(resolution: Resolution, extent: Extent, topology: Topology) -> Self {
        Self {
            nx: resolution.nx,
            ny: resolution.ny,
            width: extent.width,
            height: extent.height,
            x_start: extent.x_start,
            y_start: extent.y_start,
            topology: topology.code(),
        }
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.nx, self.ny)
    }

    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height, self.x_start, self.y_start)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canvas {
    pub resolution: Resolution,
    pub extent: Extent,
    pub topology_code: u32,
    pub vertex_count: usize,
    pub vertex_buffer_length: usize,
    pub index_count: usize,
    pub vertices: Region,
    pub indices: Region,
}

impl Canvas {
    /// Copies the geometry out of `params`. Sizes and regions stay empty until
    /// the canvas is reset against a set of buffers.
    pub fn from_parameters(params: &CanvasParameters) -> Self {
        Self {
            resolution: params.resolution(),
            extent: params.extent(),
            topology_code: params.topology,
            ..Self::default()
        }
    }

    pub fn topology(&self) -> Option<Topology> {
        Topology::from_code(self.topology_code)
    }

    /// Recomputes the vertex sizes and rebinds the vertex region.
    pub fn reset_mesh(&mut self, buffers: &FixedBuffers) -> MeshResult<()> {
        let Resolution { nx, ny } = self.resolution;
        if self.resolution.is_degenerate() {
            return Err(MeshError::DegenerateResolution { nx, ny });
        }

        let vertex_count = self.resolution.vertex_count();
        let vertex_buffer_length = 3 * vertex_count;
        self.vertices = buffers.bind_vertices(vertex_buffer_length)?;
        self.vertex_count = vertex_count;
        self.vertex_buffer_length = vertex_buffer_length;

        debug!("canvas {nx}x{ny}: {vertex_count} vertices bound");
        Ok(())
    }

    /// Recomputes the index count for the current topology and rebinds the
    /// index region. An unknown topology binds an empty region.
    pub fn reset_indices(&mut self, buffers: &FixedBuffers) -> MeshResult<()> {
        let index_count = compute_index_size(self.resolution, self.topology_code);
        self.indices = buffers.bind_indices(index_count)?;
        self.index_count = index_count;

        debug!(
            "canvas topology {}: {index_count} index slots bound",
            self.topology_code
        );
        Ok(())
    }

    /// Line segments described by the bound index region. After generation
    /// this can differ from `index_count / 2`, see [`MeshContext::generate`].
    ///
    /// [`MeshContext::generate`]: crate::mesh::MeshContext::generate
    pub fn segment_count(&self) -> usize {
        self.indices.len / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(nx: u32, ny: u32, topology: u32) -> CanvasParameters {
        CanvasParameters {
            nx,
            ny,
            width: 2.0,
            height: 2.0,
            x_start: -1.0,
            y_start: -1.0,
            topology,
        }
    }

    #[test]
    fn reset_sizes_both_regions() {
        let buffers = FixedBuffers::with_grid_limit(8, 8);
        let mut canvas = Canvas::from_parameters(&params(3, 3, 0));
        canvas.reset_mesh(&buffers).unwrap();
        canvas.reset_indices(&buffers).unwrap();

        assert_eq!(canvas.vertex_count, 9);
        assert_eq!(canvas.vertex_buffer_length, 27);
        assert_eq!(canvas.vertices.len, 27);
        assert_eq!(canvas.index_count, 24);
        assert_eq!(canvas.indices.len, 24);
        assert_eq!(canvas.segment_count(), 12);
    }

    #[test]
    fn degenerate_resolution_is_rejected() {
        let buffers = FixedBuffers::with_grid_limit(8, 8);
        let mut canvas = Canvas::from_parameters(&params(1, 5, 0));
        assert_eq!(
            canvas.reset_mesh(&buffers),
            Err(MeshError::DegenerateResolution { nx: 1, ny: 5 })
        );
        assert_eq!(canvas.vertices, Region::default());
    }

    #[test]
    fn unknown_topology_binds_nothing() {
        let buffers = FixedBuffers::with_grid_limit(8, 8);
        let mut canvas = Canvas::from_parameters(&params(4, 4, 99));
        canvas.reset_indices(&buffers).unwrap();
        assert_eq!(canvas.index_count, 0);
        assert!(canvas.indices.is_empty());
        assert_eq!(canvas.topology(), None);
    }

    #[test]
    fn oversized_grid_overflows_vertex_buffer() {
        let buffers = FixedBuffers::with_grid_limit(4, 4);
        let mut canvas = Canvas::from_parameters(&params(5, 4, 0));
        assert!(matches!(
            canvas.reset_mesh(&buffers),
            Err(MeshError::CapacityExceeded { required: 60, capacity: 48, .. })
        ));
    }

    #[test]
    fn step_divides_extent_by_intervals() {
        let extent = Extent::new(2.0, 6.0, 0.0, 0.0);
        assert_eq!(extent.step(Resolution::new(3, 4)), (1.0, 2.0));
    }
}
