use crate::input::{InputFrame, InputState, Key};

use super::fly::{Camera, CameraMovement};
use super::mouse_look::MouseLook;

/// Per-application camera state: the camera plus the mouse-look bookkeeping
/// that drives it.
///
/// Bindings: W/S forward and back, A/D strafe, mouse to look, wheel to zoom.
#[derive(Debug, Clone)]
pub struct FlyControls {
    pub camera: Camera,
    pub constrain_pitch: bool,
    look: MouseLook,
}

impl FlyControls {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            constrain_pitch: true,
            look: MouseLook::new(),
        }
    }

    /// Applies one frame of input.
    ///
    /// With the cursor captured, raw device motion turns the camera; otherwise
    /// successive cursor positions do.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32, cursor_captured: bool) {
        const BINDINGS: [(Key, CameraMovement); 4] = [
            (Key::W, CameraMovement::Forward),
            (Key::S, CameraMovement::Backward),
            (Key::A, CameraMovement::Left),
            (Key::D, CameraMovement::Right),
        ];
        for (key, movement) in BINDINGS {
            if input.key_down(key) {
                self.camera.process_movement(movement, dt);
            }
        }

        if cursor_captured {
            let motion = frame.mouse_motion;
            if motion != glam::Vec2::ZERO {
                self.camera
                    .process_mouse_movement(motion.x, -motion.y, self.constrain_pitch);
            }
        } else {
            for &position in &frame.pointer_positions {
                let offset = self.look.offset(position);
                self.camera
                    .process_mouse_movement(offset.x, offset.y, self.constrain_pitch);
            }
            if input.pointer.is_none() {
                self.look.reset();
            }
        }

        if frame.wheel_lines.y != 0.0 {
            self.camera.process_scroll(frame.wheel_lines.y);
        }
    }
}

impl Default for FlyControls {
    fn default() -> Self {
        Self::new(Camera::default())
    }
}
