//! Rotation of the vertex set about the z axis.
//!
//! The cosine/sine pair is computed once per angle change and reused for
//! every subsequent rotation step. By default it comes from a truncated
//! Taylor series, which is only accurate for small angles; animations should
//! rotate by many small steps rather than one large one.

use glam::Vec2;
use log::trace;
use serde::{Deserialize, Serialize};

// Taylor coefficients for cosine and sine.
const C0: f32 = 1.000_000_00E+00;
const C1: f32 = -5.000_000_00E-01;
const C2: f32 = 4.166_666_67E-02;
const S0: f32 = 1.000_000_00E+00;
const S1: f32 = -1.666_666_67E-01;

/// cos(z) for small z, from `zsq = z * z`.
#[inline(always)]
pub fn small_angle_cos(zsq: f32) -> f32 {
    C0 + zsq * (C1 + zsq * C2)
}

/// sin(z) for small z.
#[inline(always)]
pub fn small_angle_sin(z: f32, zsq: f32) -> f32 {
    z * (S0 + zsq * S1)
}

/// How the cached (cos, sin) pair is derived from the angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RotationStrategy {
    /// `1 - a²/2 + a⁴/24` and `a - a³/6`.
    #[default]
    SmallAngle,
    /// `cos(a)` and `sin(a)`.
    Exact,
}

impl RotationStrategy {
    pub const ALL: [RotationStrategy; 2] = [RotationStrategy::SmallAngle, RotationStrategy::Exact];

    /// The (cos, sin) pair for `angle`, as a unit-ish complex number.
    pub fn rotor(self, angle: f32) -> Vec2 {
        match self {
            Self::SmallAngle => {
                let angle_squared = angle * angle;
                Vec2::new(
                    small_angle_cos(angle_squared),
                    small_angle_sin(angle, angle_squared),
                )
            }
            Self::Exact => Vec2::from_angle(angle),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::SmallAngle => "small-angle",
            Self::Exact => "exact",
        }
    }
}

/// Current step angle and its cached cosine and sine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    angle: f32,
    strategy: RotationStrategy,
    rotor: Vec2,
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new(RotationStrategy::default())
    }
}

impl RotationState {
    /// Identity rotation.
    pub fn new(strategy: RotationStrategy) -> Self {
        Self {
            angle: 0.0,
            strategy,
            rotor: Vec2::X,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn strategy(&self) -> RotationStrategy {
        self.strategy
    }

    pub fn cos(&self) -> f32 {
        self.rotor.x
    }

    pub fn sin(&self) -> f32 {
        self.rotor.y
    }

    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.rotor = self.strategy.rotor(angle);
    }

    /// Switches strategy and recomputes the pair for the current angle.
    pub fn set_strategy(&mut self, strategy: RotationStrategy) {
        self.strategy = strategy;
        self.rotor = strategy.rotor(self.angle);
    }

    /// Rotates the first `vertex_count` vertices of `buffer` by the cached
    /// angle.
    pub fn apply(&self, buffer: &mut [f32], vertex_count: usize) {
        trace!("rotating {vertex_count} vertices by {}", self.angle);
        rotate_all(buffer, vertex_count, self.cos(), self.sin());
    }
}

/// Replaces each vertex's `(x, y)` with `(cos*x - sin*y, cos*y + sin*x)`.
/// `z` is left alone.
pub fn rotate_all(buffer: &mut [f32], vertex_count: usize, cos: f32, sin: f32) {
    let rotor = Vec2::new(cos, sin);
    for vertex in buffer.chunks_exact_mut(3).take(vertex_count) {
        let rotated = rotor.rotate(Vec2::new(vertex[0], vertex[1]));
        vertex[0] = rotated.x;
        vertex[1] = rotated.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn sample_vertices() -> Vec<f32> {
        vec![
            1.0, 0.0, 5.0, //
            0.0, 2.0, -1.0, //
            -3.0, 4.0, 0.5, //
            0.25, -0.75, 2.0,
        ]
    }

    #[test]
    fn starts_as_identity() {
        let state = RotationState::default();
        assert_eq!(state.angle(), 0.0);
        assert_eq!(state.cos(), 1.0);
        assert_eq!(state.sin(), 0.0);

        let mut buffer = sample_vertices();
        state.apply(&mut buffer, 4);
        assert_eq!(buffer, sample_vertices());
    }

    #[test]
    fn zero_angle_is_identity_for_both_strategies() {
        for strategy in RotationStrategy::ALL {
            let mut state = RotationState::new(strategy);
            state.set_angle(0.0);
            assert_eq!(state.cos(), 1.0);
            assert_eq!(state.sin(), 0.0);
        }
    }

    #[test]
    fn small_angle_pair_tracks_exact_trig() {
        for step in -100..=100 {
            let angle = step as f32 * 0.001;
            let rotor = RotationStrategy::SmallAngle.rotor(angle);
            assert_abs_diff_eq!(rotor.x, angle.cos(), epsilon = 1e-5);
            assert_abs_diff_eq!(rotor.y, angle.sin(), epsilon = 1e-5);
        }
    }

    #[test]
    fn preserves_radius_and_height() {
        let mut state = RotationState::default();
        state.set_angle(0.05);

        let before = sample_vertices();
        let mut after = before.clone();
        state.apply(&mut after, 4);

        for (a, b) in before.chunks_exact(3).zip(after.chunks_exact(3)) {
            assert_relative_eq!(a[0] * a[0] + a[1] * a[1], b[0] * b[0] + b[1] * b[1], max_relative = 1e-5);
            assert_eq!(a[2], b[2]);
        }
    }

    #[test]
    fn quarter_turn_with_exact_strategy() {
        let mut state = RotationState::new(RotationStrategy::Exact);
        state.set_angle(std::f32::consts::FRAC_PI_2);

        let mut buffer = vec![1.0, 0.0, 3.0];
        state.apply(&mut buffer, 1);
        assert_abs_diff_eq!(buffer[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(buffer[1], 1.0, epsilon = 1e-6);
        assert_eq!(buffer[2], 3.0);
    }

    #[test]
    fn repeated_steps_compound() {
        let mut state = RotationState::default();
        state.set_angle(0.01);

        let mut buffer = vec![1.0, 0.0, 0.0];
        for _ in 0..100 {
            state.apply(&mut buffer, 1);
        }
        assert_abs_diff_eq!(buffer[0], 1.0f32.cos(), epsilon = 1e-4);
        assert_abs_diff_eq!(buffer[1], 1.0f32.sin(), epsilon = 1e-4);
    }

    #[test]
    fn switching_strategy_recomputes_pair() {
        let mut state = RotationState::default();
        state.set_angle(0.8);
        let approx = (state.cos(), state.sin());
        state.set_strategy(RotationStrategy::Exact);
        assert_eq!(state.cos(), 0.8f32.cos());
        assert_eq!(state.sin(), 0.8f32.sin());
        assert_ne!(approx, (state.cos(), state.sin()));
    }

    #[test]
    fn only_touches_the_requested_vertices() {
        let mut buffer = sample_vertices();
        rotate_all(&mut buffer, 1, 0.0, 1.0);
        assert_eq!(&buffer[..3], &[0.0, 1.0, 5.0]);
        assert_eq!(&buffer[3..], &sample_vertices()[3..]);
    }
}
