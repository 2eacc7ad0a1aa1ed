//! Orbit camera for the 3D apparatus view

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// 3D perspective camera with orbital controls
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    // Orbital parameters
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Camera3D {
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 45.0f32.to_radians(),
            aspect_ratio,
            near: 0.1,
            far: 100.0,
            distance: 10.0,
            yaw: 0.0,
            pitch: 0.3,
        };
        camera.update_orbital();
        camera
    }

    /// Place the camera at `eye`, looking at `target`, keeping orbit controls consistent
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        let offset = eye - target;
        self.target = target;
        self.distance = offset.length().max(1.0);
        self.yaw = offset.x.atan2(offset.z);
        self.pitch = (offset.y / self.distance).clamp(-1.0, 1.0).asin();
        self.update_orbital();
    }

    /// Update camera position based on orbital parameters
    pub fn update_orbital(&mut self) {
        self.position = self.target + Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        );
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-1.5, 1.5);
        self.update_orbital();
    }

    /// Zoom in/out
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).clamp(2.0, 40.0);
        self.update_orbital();
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn update_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Project a world point to screen coordinates (origin top-left).
    ///
    /// Returns `None` for points behind the camera or outside the depth range.
    pub fn project_to_screen(&self, point: Vec3, screen_size: Vec2) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }

        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * screen_size.x,
            (1.0 - ndc.y) * 0.5 * screen_size.y,
        ))
    }
}

/// Camera uniform data for shaders
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera3D) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn look_from_reproduces_eye_position() {
        let mut camera = Camera3D::new(4.0 / 3.0);
        let eye = Vec3::new(3.0, 2.0, 6.0);
        camera.look_from(eye, Vec3::ZERO);

        assert!((camera.position - eye).length() < 1e-4);
        assert!((camera.distance - 7.0).abs() < 1e-4);
    }

    #[test]
    fn target_projects_to_screen_centre() {
        let mut camera = Camera3D::new(4.0 / 3.0);
        camera.look_from(Vec3::new(3.0, 2.0, 6.0), Vec3::ZERO);

        let centre = camera.project_to_screen(Vec3::ZERO, SCREEN).unwrap();
        assert!((centre - SCREEN * 0.5).length() < 1e-2);
    }

    #[test]
    fn screen_axes_follow_world_axes_when_facing_the_screen() {
        let mut camera = Camera3D::new(4.0 / 3.0);
        camera.look_from(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO);

        let right = camera.project_to_screen(Vec3::X, SCREEN).unwrap();
        let up = camera.project_to_screen(Vec3::Y, SCREEN).unwrap();
        assert!(right.x > SCREEN.x * 0.5);
        // Screen y grows downwards
        assert!(up.y < SCREEN.y * 0.5);
    }

    #[test]
    fn points_behind_the_camera_are_not_projected() {
        let mut camera = Camera3D::new(1.0);
        camera.look_from(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO);

        assert!(camera.project_to_screen(Vec3::new(0.0, 0.0, 20.0), SCREEN).is_none());
    }

    #[test]
    fn orbit_clamps_pitch_and_zoom_clamps_distance() {
        let mut camera = Camera3D::new(1.0);
        camera.orbit(0.0, 10.0);
        assert_eq!(camera.pitch, 1.5);

        camera.zoom(100.0);
        assert_eq!(camera.distance, 2.0);
    }
}
