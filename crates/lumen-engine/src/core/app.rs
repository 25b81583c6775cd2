use anyhow::Result;
use winit::event::WindowEvent;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract driven by [`crate::window::Runtime`].
///
/// GL resources created in `on_start` must be owned by the app; the runtime
/// drops the app before it tears the context down.
pub trait App {
    /// Called once, after the context is current and before the first frame.
    /// An error ends the run.
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()>;

    /// Called for every window event before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw. Buffers are swapped after it returns.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
