use bytemuck::{Pod, Zeroable};

use wire3d::mesh::buffers::{MAX_INDEX_BUFFER_SIZE, MAX_VERTEX_BUFFER_SIZE};
use wire3d::mesh::MeshSnapshot;

const MAX_GRID_VERTICES: usize = 2000;

/// Height range used to colour the wireframe.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct WireframeUniforms {
    pub z_min: f32,
    pub z_max: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

/// GPU copies of the mesh vertex and index buffers, sized like the mesh
/// context's own storage so any canvas it accepts fits.
pub struct WireframeBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub grid_vertex_buffer: wgpu::Buffer,

    pub vertex_float_count: usize,
    pub index_count: u32,
    pub grid_vertex_count: u32,

    pub z_min: f32,
    pub z_max: f32,
}

impl WireframeBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wireframe Vertex Buffer"),
            size: (MAX_VERTEX_BUFFER_SIZE * 4) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wireframe Index Buffer"),
            size: (MAX_INDEX_BUFFER_SIZE * 4) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wireframe Uniform Buffer"),
            size: std::mem::size_of::<WireframeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let grid_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Grid Vertex Buffer"),
            size: (MAX_GRID_VERTICES * 3 * 4) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            vertex_buffer,
            index_buffer,
            uniform_buffer,
            grid_vertex_buffer,
            vertex_float_count: 0,
            index_count: 0,
            grid_vertex_count: 0,
            z_min: 0.0,
            z_max: 1.0,
        }
    }

    pub fn upload_mesh(&mut self, queue: &wgpu::Queue, mesh: &MeshSnapshot) {
        let vertex_count = mesh.vertices.len().min(MAX_VERTEX_BUFFER_SIZE);
        let index_count = mesh.indices.len().min(MAX_INDEX_BUFFER_SIZE);

        if vertex_count > 0 {
            queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&mesh.vertices[..vertex_count]),
            );
        }
        if index_count > 0 {
            queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(&mesh.indices[..index_count]),
            );
        }

        self.vertex_float_count = vertex_count;
        self.index_count = index_count as u32;
        self.z_min = mesh.z_range.0;
        self.z_max = mesh.z_range.1;

        let uniforms = WireframeUniforms {
            z_min: self.z_min,
            z_max: self.z_max,
            _pad1: 0.0,
            _pad2: 0.0,
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
    }

    /// Replaces vertex positions only; rotation frames keep the index buffer.
    /// Frames from a canvas of another size are ignored.
    pub fn upload_vertices(&mut self, queue: &wgpu::Queue, vertices: &[f32]) -> bool {
        if vertices.is_empty() || vertices.len() != self.vertex_float_count {
            return false;
        }
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        true
    }

    pub fn upload_grid(&mut self, queue: &wgpu::Queue, vertices: &[f32]) {
        let vertex_count = vertices.len().min(MAX_GRID_VERTICES * 3);
        queue.write_buffer(
            &self.grid_vertex_buffer,
            0,
            bytemuck::cast_slice(&vertices[..vertex_count]),
        );
        self.grid_vertex_count = (vertex_count / 3) as u32;
    }
}

pub fn position_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: 12,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

/// Line list for a square reference grid in the plane `z = height`, from
/// `-size` to `size` on both axes, plus red/green/blue x/y/z axes.
pub fn generate_grid_vertices(size: f32, divisions: u32, height: f32) -> Vec<f32> {
    let mut vertices = Vec::new();
    let step = size * 2.0 / divisions as f32;
    let half = size;

    for i in 0..=divisions {
        let pos = -half + i as f32 * step;
        vertices.extend_from_slice(&[pos, -half, height, pos, half, height]);
        vertices.extend_from_slice(&[-half, pos, height, half, pos, height]);
    }

    vertices.extend_from_slice(&[-half, 0.0, 0.0, half, 0.0, 0.0]);
    vertices.extend_from_slice(&[0.0, -half, 0.0, 0.0, half, 0.0]);
    vertices.extend_from_slice(&[0.0, 0.0, -half, 0.0, 0.0, half]);

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_a_line_list_on_the_floor() {
        let vertices = generate_grid_vertices(2.0, 4, -1.5);
        // five lines per direction plus three axes, two endpoints each
        assert_eq!(vertices.len(), (5 * 2 + 3) * 2 * 3);
        for endpoint in vertices.chunks_exact(3).take(20) {
            assert_eq!(endpoint[2], -1.5);
        }
        assert!(vertices.len() / 3 <= MAX_GRID_VERTICES);
    }
}
