use glam::Vec2;

/// Turns absolute cursor positions into look offsets.
///
/// The first sample only establishes a reference point, so the camera does
/// not jump to wherever the cursor entered the window. Y is inverted:
/// moving the cursor up yields a positive offset.
#[derive(Debug, Default, Clone)]
pub struct MouseLook {
    last: Option<Vec2>,
}

impl MouseLook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&mut self, position: Vec2) -> Vec2 {
        let offset = match self.last {
            Some(last) => Vec2::new(position.x - last.x, last.y - position.y),
            None => Vec2::ZERO,
        };
        self.last = Some(position);
        offset
    }

    /// Forgets the reference point, e.g. after the cursor left the window.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
