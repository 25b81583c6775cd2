use glam::{Mat4, Vec3};

/// Horizontal movement relative to where the camera looks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
}

/// Euler-angle fly camera.
///
/// Angles are in degrees. Yaw -90 looks down -Z.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub world_up: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// World units per second.
    pub movement_speed: f32,
    /// Degrees per pixel of mouse motion.
    pub mouse_sensitivity: f32,
    /// Vertical field of view in degrees.
    pub zoom: f32,

    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    pub const YAW: f32 = -90.0;
    pub const PITCH: f32 = 0.0;
    pub const SPEED: f32 = 2.5;
    pub const SENSITIVITY: f32 = 0.1;
    pub const ZOOM: f32 = 45.0;

    pub const PITCH_LIMIT: f32 = 89.0;
    pub const ZOOM_MIN: f32 = 1.0;
    pub const ZOOM_MAX: f32 = 45.0;

    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 100.0;

    pub fn new(position: Vec3) -> Self {
        Self::with_angles(position, Vec3::Y, Self::YAW, Self::PITCH)
    }

    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            world_up,
            yaw,
            pitch,
            movement_speed: Self::SPEED,
            mouse_sensitivity: Self::SENSITIVITY,
            zoom: Self::ZOOM,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Perspective projection for the current zoom, GL clip conventions.
    pub fn projection(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect_ratio, Self::NEAR, Self::FAR)
    }

    pub fn process_movement(&mut self, direction: CameraMovement, dt: f32) {
        let step = self.movement_speed * dt;
        match direction {
            CameraMovement::Forward => self.position += self.front * step,
            CameraMovement::Backward => self.position -= self.front * step,
            CameraMovement::Left => self.position -= self.right * step,
            CameraMovement::Right => self.position += self.right * step,
        }
    }

    /// Turns by a mouse offset in pixels. Positive `dy` looks up.
    pub fn process_mouse_movement(&mut self, dx: f32, dy: f32, constrain_pitch: bool) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch += dy * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
        }

        self.update_vectors();
    }

    /// Scrolling up zooms in.
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(Self::ZOOM_MIN, Self::ZOOM_MAX);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 3.0))
    }
}
