use winit::window::Window;

use crate::gl::{ClearFlags, Gl};
use crate::input::{InputFrame, InputState};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Context passed to `App::on_start`.
pub struct StartCtx<'a> {
    pub window: &'a Window,
    pub gl: &'a Gl,
    pub runtime: &'a mut RuntimeCtx,
}

impl StartCtx<'_> {
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.window)
    }
}

/// Per-frame context passed to `App::on_frame`.
pub struct FrameCtx<'a> {
    pub window: &'a Window,
    pub gl: &'a Gl,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    /// Whether the cursor is grabbed, so look input arrives as raw motion.
    pub cursor_captured: bool,
    pub runtime: &'a mut RuntimeCtx,
}

impl FrameCtx<'_> {
    /// Framebuffer width over height; 1.0 while minimized.
    pub fn aspect_ratio(&self) -> f32 {
        aspect_ratio(self.window)
    }

    /// Clears the selected buffers of the default framebuffer to `rgba`.
    pub fn clear(&self, rgba: [f32; 4], flags: ClearFlags) {
        self.gl.clear_color(rgba);
        self.gl.clear(flags);
    }
}

fn aspect_ratio(window: &Window) -> f32 {
    let size = window.inner_size();
    framebuffer_aspect(size.width, size.height)
}

fn framebuffer_aspect(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
