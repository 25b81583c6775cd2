//! First-person fly camera and the controls that feed it.

mod controls;
mod fly;
mod mouse_look;

pub use controls::FlyControls;
pub use fly::{Camera, CameraMovement};
pub use mouse_look::MouseLook;
