//! Preallocated vertex and index storage.
//!
//! Both buffers are allocated once, sized for the largest grid the context
//! accepts, and never grow. A canvas refers to the part it uses through a
//! [`Region`] instead of holding a slice, so the storage can be rebound on
//! every reset without copying.

use std::ops::Range;

use crate::mesh::error::{BufferKind, MeshError, MeshResult};

/// Largest number of samples along x.
pub const MAX_WIDTH: u32 = 512;
/// Largest number of samples along y.
pub const MAX_HEIGHT: u32 = 512;
/// Largest grid, in vertices.
pub const MAX_NUMBER_OF_POINTS: usize = (MAX_WIDTH * MAX_HEIGHT) as usize;
/// Three floats per vertex.
pub const MAX_VERTEX_BUFFER_SIZE: usize = 3 * MAX_NUMBER_OF_POINTS;
/// The toroidal triangle wireframe is the worst case: three segments per
/// vertex, two indices per segment.
pub const MAX_INDEX_BUFFER_SIZE: usize = 6 * MAX_NUMBER_OF_POINTS;

/// A contiguous window into one of the fixed buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub offset: usize,
    pub len: usize,
}

impl Region {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub struct FixedBuffers {
    vertices: Box<[f32]>,
    indices: Box<[u32]>,
    max_width: u32,
    max_height: u32,
}

impl Default for FixedBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedBuffers {
    /// Storage for grids up to `MAX_WIDTH` x `MAX_HEIGHT`.
    pub fn new() -> Self {
        Self::with_grid_limit(MAX_WIDTH, MAX_HEIGHT)
    }

    /// Storage for grids up to `max_width` x `max_height` samples.
    pub fn with_grid_limit(max_width: u32, max_height: u32) -> Self {
        let points = max_width as usize * max_height as usize;
        Self {
            vertices: vec![0.0; 3 * points].into_boxed_slice(),
            indices: vec![0; 6 * points].into_boxed_slice(),
            max_width,
            max_height,
        }
    }

    pub fn grid_limit(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    pub fn vertex_capacity(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_capacity(&self) -> usize {
        self.indices.len()
    }

    /// Claims the first `len` vertex floats.
    pub fn bind_vertices(&self, len: usize) -> MeshResult<Region> {
        bind(BufferKind::Vertex, len, self.vertex_capacity())
    }

    /// Claims the first `len` index slots.
    pub fn bind_indices(&self, len: usize) -> MeshResult<Region> {
        bind(BufferKind::Index, len, self.index_capacity())
    }

    pub fn vertices(&self, region: Region) -> &[f32] {
        &self.vertices[region.range()]
    }

    pub fn vertices_mut(&mut self, region: Region) -> &mut [f32] {
        &mut self.vertices[region.range()]
    }

    pub fn indices(&self, region: Region) -> &[u32] {
        &self.indices[region.range()]
    }

    pub fn indices_mut(&mut self, region: Region) -> &mut [u32] {
        &mut self.indices[region.range()]
    }

    /// Whole vertex storage; base of the host-visible vertex array.
    pub fn vertex_storage(&self) -> &[f32] {
        &self.vertices
    }

    /// Whole index storage; base of the host-visible index array.
    pub fn index_storage(&self) -> &[u32] {
        &self.indices
    }
}

fn bind(buffer: BufferKind, len: usize, capacity: usize) -> MeshResult<Region> {
    if len > capacity {
        return Err(MeshError::CapacityExceeded {
            buffer,
            required: len,
            capacity,
        });
    }
    Ok(Region { offset: 0, len })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_matches_reference_sizing() {
        let buffers = FixedBuffers::new();
        assert_eq!(buffers.vertex_capacity(), 3 * 512 * 512);
        assert_eq!(buffers.index_capacity(), 6 * 512 * 512);
        assert_eq!(buffers.grid_limit(), (512, 512));
    }

    #[test]
    fn binding_past_capacity_fails() {
        let buffers = FixedBuffers::with_grid_limit(4, 4);
        assert_eq!(buffers.bind_vertices(48).map(|r| r.len), Ok(48));
        assert_eq!(
            buffers.bind_vertices(49),
            Err(MeshError::CapacityExceeded {
                buffer: BufferKind::Vertex,
                required: 49,
                capacity: 48,
            })
        );
        assert!(buffers.bind_indices(97).is_err());
    }

    #[test]
    fn regions_view_the_same_storage() {
        let mut buffers = FixedBuffers::with_grid_limit(2, 2);
        let region = buffers.bind_vertices(6).unwrap();
        buffers.vertices_mut(region).copy_from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buffers.vertices(region), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(buffers.vertex_storage()[..6], [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
