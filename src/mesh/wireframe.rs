//! Index-pair generation for wireframes.
//!
//! Segments are emitted per vertex in row-major order: first the edge to the
//! vertex above, then the edge to the vertex on the right, then (triangle
//! topologies only) the diagonal to the vertex above-right. Wrapping
//! topologies reach across their seams; open edges are skipped.

use crate::mesh::canvas::Resolution;
use crate::mesh::topology::{Seam, Topology};

/// Emits the planar square wireframe into `buffer` and returns the number of
/// indices written, `2 * (2 * nx * ny - nx - ny)`.
///
/// For each vertex `idx00 = y * nx + x`: `(idx00, idx00 + nx)` unless `y` is
/// the last row, then `(idx00, idx00 + 1)` unless `x` is the last column.
pub fn generate_planar_indices(buffer: &mut [u32], resolution: Resolution) -> usize {
    let Resolution { nx, ny } = resolution;
    let mut out = IndexWriter::new(buffer);

    for y_index in 0..ny {
        let shift = y_index * nx;
        for x_index in 0..nx {
            let index00 = shift + x_index;
            if y_index != ny - 1 {
                out.push(index00, index00 + nx);
            }
            if x_index != nx - 1 {
                out.push(index00, index00 + 1);
            }
        }
    }

    out.written()
}

/// Emits the wireframe for any topology and returns the number of indices
/// written, which is always `2 * segment_count(resolution, topology)`.
pub fn generate_indices(buffer: &mut [u32], resolution: Resolution, topology: Topology) -> usize {
    if topology == Topology::PlanarSquare {
        return generate_planar_indices(buffer, resolution);
    }

    let grid = Grid::new(resolution, topology);
    let diagonals = topology.has_diagonals();
    let mut out = IndexWriter::new(buffer);

    for y in 0..resolution.ny {
        for x in 0..resolution.nx {
            let here = grid.index(x, y);
            let up = grid.step_y(x, y);

            if let Some((ux, uy)) = up {
                out.push(here, grid.index(ux, uy));
            }
            if let Some((rx, ry)) = grid.step_x(x, y) {
                out.push(here, grid.index(rx, ry));
            }
            if diagonals {
                if let Some(corner) = grid.diagonal(x, y) {
                    out.push(here, corner);
                }
            }
        }
    }

    out.written()
}

/// Exact number of segments `generate_indices` emits.
pub fn segment_count(resolution: Resolution, topology: Topology) -> usize {
    let nx = resolution.nx as usize;
    let ny = resolution.ny as usize;
    let (x_seam, y_seam) = topology.seams();

    // vertices that have a neighbour past them along each axis
    let fx = if x_seam == Seam::Open { nx.saturating_sub(1) } else { nx };
    let fy = if y_seam == Seam::Open { ny.saturating_sub(1) } else { ny };

    let up = nx * fy;
    let right = fx * ny;
    let diagonal = if topology.has_diagonals() { fx * fy } else { 0 };
    up + right + diagonal
}

struct Grid {
    nx: u32,
    ny: u32,
    x_seam: Seam,
    y_seam: Seam,
}

impl Grid {
    fn new(resolution: Resolution, topology: Topology) -> Self {
        let (x_seam, y_seam) = topology.seams();
        Self {
            nx: resolution.nx,
            ny: resolution.ny,
            x_seam,
            y_seam,
        }
    }

    fn index(&self, x: u32, y: u32) -> u32 {
        y * self.nx + x
    }

    /// Right-hand neighbour of `(x, y)`.
    fn step_x(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if x + 1 < self.nx {
            return Some((x + 1, y));
        }
        match self.x_seam {
            Seam::Open => None,
            Seam::Periodic => Some((0, y)),
            Seam::Twisted => Some((0, self.ny - 1 - y)),
        }
    }

    /// Far corner of the cell above and to the right of `(x, y)`.
    ///
    /// Up-then-right crossing two twisted seams can land back on `(x, y)`;
    /// right-then-up never does, since it ends on row 0 from the top row.
    fn diagonal(&self, x: u32, y: u32) -> Option<u32> {
        let here = self.index(x, y);
        let (ux, uy) = self.step_y(x, y)?;
        let (dx, dy) = self.step_x(ux, uy)?;
        let corner = self.index(dx, dy);
        if corner != here {
            return Some(corner);
        }
        let (rx, ry) = self.step_x(x, y)?;
        let (cx, cy) = self.step_y(rx, ry)?;
        Some(self.index(cx, cy))
    }

    /// Upper neighbour of `(x, y)`.
    fn step_y(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        if y + 1 < self.ny {
            return Some((x, y + 1));
        }
        match self.y_seam {
            Seam::Open => None,
            Seam::Periodic => Some((x, 0)),
            Seam::Twisted => Some((self.nx - 1 - x, 0)),
        }
    }
}

struct IndexWriter<'a> {
    buffer: &'a mut [u32],
    cursor: usize,
}

impl<'a> IndexWriter<'a> {
    fn new(buffer: &'a mut [u32]) -> Self {
        Self { buffer, cursor: 0 }
    }

    #[inline(always)]
    fn push(&mut self, from: u32, to: u32) {
        self.buffer[self.cursor] = from;
        self.buffer[self.cursor + 1] = to;
        self.cursor += 2;
    }

    fn written(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generate(resolution: Resolution, topology: Topology) -> Vec<u32> {
        let mut buffer = vec![u32::MAX; 6 * resolution.vertex_count()];
        let written = generate_indices(&mut buffer, resolution, topology);
        buffer.truncate(written);
        buffer
    }

    fn segments(indices: &[u32]) -> Vec<(u32, u32)> {
        indices.chunks_exact(2).map(|p| (p[0], p[1])).collect()
    }

    #[test]
    fn planar_three_by_three_order() {
        let mut buffer = [0u32; 24];
        let written = generate_planar_indices(&mut buffer, Resolution::new(3, 3));
        assert_eq!(written, 24);
        assert_eq!(
            segments(&buffer),
            vec![
                (0, 3),
                (0, 1),
                (1, 4),
                (1, 2),
                (2, 5),
                (3, 6),
                (3, 4),
                (4, 7),
                (4, 5),
                (5, 8),
                (6, 7),
                (7, 8),
            ]
        );
    }

    #[test]
    fn planar_count_matches_calculator() {
        for (nx, ny) in [(3, 3), (2, 5), (4, 2), (2, 2), (7, 11)] {
            let resolution = Resolution::new(nx, ny);
            let mut buffer = vec![0u32; 6 * resolution.vertex_count()];
            let written = generate_planar_indices(&mut buffer, resolution);
            assert_eq!(written, Topology::PlanarSquare.index_size(resolution), "{nx}x{ny}");
        }
    }

    #[test]
    fn emitted_counts_follow_segment_count() {
        for topology in Topology::ALL {
            for (nx, ny) in [(2, 2), (3, 4), (5, 3), (6, 6)] {
                let resolution = Resolution::new(nx, ny);
                let indices = generate(resolution, topology);
                assert_eq!(indices.len(), 2 * segment_count(resolution, topology), "{topology} {nx}x{ny}");
            }
        }
    }

    #[test]
    fn wrapping_counts_agree_with_calculator() {
        for topology in Topology::ALL {
            if topology == Topology::PlanarTriangle {
                continue;
            }
            for (nx, ny) in [(2, 3), (4, 4), (9, 5)] {
                let resolution = Resolution::new(nx, ny);
                assert_eq!(
                    2 * segment_count(resolution, topology),
                    topology.index_size(resolution),
                    "{topology} {nx}x{ny}"
                );
            }
        }
    }

    #[test]
    fn planar_triangle_has_one_more_segment_than_sized() {
        let resolution = Resolution::new(4, 3);
        let emitted = 2 * segment_count(resolution, Topology::PlanarTriangle);
        assert_eq!(emitted, Topology::PlanarTriangle.index_size(resolution) + 2);
    }

    #[test]
    fn planar_triangle_adds_cell_diagonals() {
        let indices = generate(Resolution::new(2, 2), Topology::PlanarTriangle);
        assert_eq!(segments(&indices), vec![(0, 2), (0, 1), (0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn projective_corner_diagonal_reaches_another_vertex() {
        for (nx, ny) in [(2, 2), (3, 3), (5, 4)] {
            let resolution = Resolution::new(nx, ny);
            let indices = generate(resolution, Topology::ProjectiveTriangle);
            assert_eq!(indices.len(), Topology::ProjectiveTriangle.index_size(resolution));

            let corner = (ny - 1) * nx;
            let from_corner: Vec<_> = segments(&indices)
                .into_iter()
                .filter(|&(a, _)| a == corner)
                .collect();
            assert_eq!(from_corner.len(), 3, "{nx}x{ny}");
            // right along the top row, then over the twisted top seam
            assert!(from_corner.contains(&(corner, nx - 2)), "{nx}x{ny}");
            assert!(from_corner.iter().all(|&(a, b)| a != b), "{nx}x{ny}");
        }
    }

    #[test]
    fn indices_stay_in_range_without_loops() {
        for topology in Topology::ALL {
            let resolution = Resolution::new(5, 4);
            let indices = generate(resolution, topology);
            for (a, b) in segments(&indices) {
                assert!((a as usize) < resolution.vertex_count());
                assert!((b as usize) < resolution.vertex_count());
                assert_ne!(a, b, "{topology}");
            }
        }
    }

    #[test]
    fn cylinder_joins_right_edge_to_left() {
        let indices = generate(Resolution::new(3, 2), Topology::CylindricalSquare);
        let set: HashSet<_> = segments(&indices).into_iter().collect();
        assert!(set.contains(&(2, 0)));
        assert!(set.contains(&(5, 3)));
        assert!(!set.iter().any(|&(a, b)| a >= 3 && b < 3));
    }

    #[test]
    fn mobius_seam_mirrors_rows() {
        let resolution = Resolution::new(3, 4);
        let indices = generate(resolution, Topology::MobiusSquare);
        let set: HashSet<_> = segments(&indices).into_iter().collect();
        // (2, y) joins (0, 3 - y)
        for y in 0..4u32 {
            assert!(set.contains(&(y * 3 + 2, (3 - y) * 3)), "row {y}");
        }
    }

    #[test]
    fn torus_square_is_four_regular() {
        let resolution = Resolution::new(4, 5);
        let indices = generate(resolution, Topology::ToroidalSquare);
        let mut degree = vec![0usize; resolution.vertex_count()];
        for index in &indices {
            degree[*index as usize] += 1;
        }
        assert!(degree.iter().all(|&d| d == 4));
    }

    #[test]
    fn projective_top_seam_mirrors_columns() {
        let resolution = Resolution::new(4, 3);
        let indices = generate(resolution, Topology::ProjectiveSquare);
        let set: HashSet<_> = segments(&indices).into_iter().collect();
        // (x, 2) joins (3 - x, 0)
        for x in 0..4u32 {
            assert!(set.contains(&(8 + x, 3 - x)), "column {x}");
        }
    }
}
