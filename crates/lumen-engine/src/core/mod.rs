//! Contract between the runtime loop and applications.
//!
//! Apps see a window, a GL handle, input and timing through the contexts
//! here; winit's event loop stays inside the runtime.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, StartCtx};
