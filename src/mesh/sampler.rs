//! Vertex sampling of height fields z = f(x, y).

use crate::mesh::canvas::{Extent, Resolution};

/// A height field sampled over the canvas.
pub trait Surface {
    fn height(&self, x: f32, y: f32) -> f32;
}

impl<F> Surface for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height(&self, x: f32, y: f32) -> f32 {
        self(x, y)
    }
}

/// Writes `nx * ny` vertices into `buffer`, row-major (`y * nx + x`), three
/// floats each.
///
/// `buffer` must hold at least `3 * nx * ny` floats and both axes need two or
/// more samples; the canvas checks both before calling this.
pub fn sample_vertices<S>(buffer: &mut [f32], resolution: Resolution, extent: Extent, surface: &S)
where
    S: Surface + ?Sized,
{
    let (dx, dy) = extent.step(resolution);
    let nx = resolution.nx as usize;

    for (y_index, row) in buffer
        .chunks_exact_mut(3 * nx)
        .take(resolution.ny as usize)
        .enumerate()
    {
        let y = extent.y_start + y_index as f32 * dy;

        for (x_index, vertex) in row.chunks_exact_mut(3).enumerate() {
            let x = extent.x_start + x_index as f32 * dx;
            vertex[0] = x;
            vertex[1] = y;
            vertex[2] = surface.height(x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flat_two_by_two_grid() {
        let mut buffer = [f32::NAN; 12];
        sample_vertices(
            &mut buffer,
            Resolution::new(2, 2),
            Extent::new(2.0, 2.0, -1.0, -1.0),
            &|_: f32, _: f32| 0.0_f32,
        );
        assert_eq!(
            buffer,
            [-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, -1.0, 1.0, 0.0, 1.0, 1.0, 0.0]
        );
    }

    #[test]
    fn rows_advance_along_y() {
        let mut buffer = vec![0.0; 3 * 3 * 2];
        sample_vertices(
            &mut buffer,
            Resolution::new(3, 2),
            Extent::new(4.0, 1.0, 0.0, 10.0),
            &|x: f32, y: f32| x + y,
        );

        let vertex = |i: usize| &buffer[3 * i..3 * i + 3];
        assert_eq!(vertex(0), &[0.0, 10.0, 10.0]);
        assert_eq!(vertex(2), &[4.0, 10.0, 14.0]);
        assert_eq!(vertex(3), &[0.0, 11.0, 11.0]);
        assert_eq!(vertex(5), &[4.0, 11.0, 15.0]);
    }

    #[test]
    fn evaluates_the_surface_at_each_sample() {
        let mut buffer = vec![0.0; 3 * 5 * 5];
        let paraboloid = |x: f32, y: f32| x * x + 2.0 * y * y - 2.0;
        sample_vertices(
            &mut buffer,
            Resolution::new(5, 5),
            Extent::new(2.0, 2.0, -1.0, -1.0),
            &paraboloid,
        );

        for vertex in buffer.chunks_exact(3) {
            assert_relative_eq!(vertex[2], paraboloid(vertex[0], vertex[1]));
        }
        // centre sample sits at the origin
        assert_relative_eq!(buffer[3 * 12 + 2], -2.0);
    }

    #[test]
    fn leaves_storage_past_the_grid_untouched() {
        let mut buffer = [7.0; 15];
        sample_vertices(
            &mut buffer,
            Resolution::new(2, 2),
            Extent::new(1.0, 1.0, 0.0, 0.0),
            &|_: f32, _: f32| 1.0_f32,
        );
        assert_eq!(buffer[12..], [7.0, 7.0, 7.0]);
    }
}
