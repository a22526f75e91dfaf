use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Free,
    Orbital,
}

/// Perspective camera with z up. Yaw turns about z, pitch tilts out of the
/// xy plane.
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,

    pub target: Vec3,
    pub orbital_distance: f32,

    pub mode: CameraMode,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub move_speed: f32,
    pub mouse_sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            yaw: -60.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),

            target: Vec3::ZERO,
            orbital_distance: 6.0,

            mode: CameraMode::Orbital,

            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.01,
            far: 1000.0,

            move_speed: 3.0,
            mouse_sensitivity: 0.004,
            zoom_speed: 0.5,
        };
        camera.update_orbital_position();
        camera
    }
}

impl Camera {
    pub fn front(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.front().cross(Vec3::Z).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        match self.mode {
            CameraMode::Free => {
                Mat4::look_at_rh(self.position, self.position + self.front(), Vec3::Z)
            }
            CameraMode::Orbital => Mat4::look_at_rh(self.position, self.target, Vec3::Z),
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn process_keyboard(&mut self, forward: f32, right: f32, up: f32, dt: f32) {
        if self.mode != CameraMode::Free {
            return;
        }

        let speed = self.move_speed * dt;
        self.position += self.front() * forward * speed;
        self.position += self.right() * right * speed;
        self.position.z += up * speed;
    }

    pub fn process_mouse_movement(&mut self, delta: Vec2) {
        let dx = delta.x * self.mouse_sensitivity;
        let dy = delta.y * self.mouse_sensitivity;

        match self.mode {
            CameraMode::Free => {
                self.yaw -= dx;
                self.pitch -= dy;
            }
            // dragging moves the eye around the target, so both axes flip
            CameraMode::Orbital => {
                self.yaw -= dx;
                self.pitch += dy;
            }
        }

        let max_pitch = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        if self.mode == CameraMode::Orbital {
            self.update_orbital_position();
        }
    }

    pub fn process_scroll(&mut self, delta: f32) {
        match self.mode {
            CameraMode::Free => {
                self.move_speed = (self.move_speed + delta * self.zoom_speed).clamp(0.1, 100.0);
            }
            CameraMode::Orbital => {
                self.orbital_distance =
                    (self.orbital_distance - delta * self.zoom_speed).clamp(0.5, 200.0);
                self.update_orbital_position();
            }
        }
    }

    pub fn set_mode(&mut self, mode: CameraMode) {
        if self.mode == mode {
            return;
        }

        match mode {
            CameraMode::Free => {
                let dir = (self.target - self.position).normalize();
                self.yaw = dir.y.atan2(dir.x);
                self.pitch = dir.z.asin();
                self.mode = CameraMode::Free;
            }
            CameraMode::Orbital => {
                self.mode = CameraMode::Orbital;
                self.orbital_distance = self.position.distance(self.target).max(0.5);

                let dir = (self.position - self.target).normalize();
                self.yaw = dir.y.atan2(dir.x);
                self.pitch = dir.z.asin();

                self.update_orbital_position();
            }
        }
    }

    /// Re-aims the orbit at `center`, far enough back to take in `radius`.
    pub fn frame(&mut self, center: Vec3, radius: f32) {
        self.target = center;
        self.orbital_distance = (radius * 2.5).clamp(0.5, 200.0);
        self.far = (self.orbital_distance * 20.0).max(100.0);
        if self.mode == CameraMode::Orbital {
            self.update_orbital_position();
        }
    }

    fn update_orbital_position(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.orbital_distance * self.yaw.cos() * self.pitch.cos(),
                self.orbital_distance * self.yaw.sin() * self.pitch.cos(),
                self.orbital_distance * self.pitch.sin(),
            );
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orbit_keeps_distance_to_target() {
        let mut camera = Camera::default();
        camera.process_mouse_movement(Vec2::new(120.0, -40.0));
        assert_relative_eq!(camera.position.distance(camera.target), 6.0, epsilon = 1e-4);
        assert!(camera.position.z > 0.0);
    }

    #[test]
    fn frame_centres_orbit() {
        let mut camera = Camera::default();
        camera.frame(Vec3::new(1.0, 2.0, 0.5), 2.0);
        assert_eq!(camera.target, Vec3::new(1.0, 2.0, 0.5));
        assert_relative_eq!(camera.position.distance(camera.target), 5.0, epsilon = 1e-4);
    }

    #[test]
    fn switching_modes_keeps_view_direction() {
        let mut camera = Camera::default();
        let towards_target = (camera.target - camera.position).normalize();
        camera.set_mode(CameraMode::Free);
        let front = camera.front();
        assert_relative_eq!(front.x, towards_target.x, epsilon = 1e-4);
        assert_relative_eq!(front.y, towards_target.y, epsilon = 1e-4);
        assert_relative_eq!(front.z, towards_target.z, epsilon = 1e-4);
    }
}
