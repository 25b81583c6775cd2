/// Requested properties of the GL context and its default framebuffer.
///
/// These are requests: the driver may grant more (e.g. extra depth bits), and
/// multisampling falls back to the closest available sample count.
#[derive(Debug, Clone)]
pub struct ContextInit {
    /// Core profile version, `(major, minor)`.
    pub gl_version: (u8, u8),

    pub depth_bits: u8,

    /// Stencil outlining needs at least 8.
    pub stencil_bits: u8,

    /// Swap on vertical blank.
    pub vsync: bool,

    /// Samples per pixel; 0 disables multisampling.
    pub msaa_samples: u8,
}

impl Default for ContextInit {
    fn default() -> Self {
        Self {
            gl_version: (3, 3),
            depth_bits: 24,
            stencil_bits: 8,
            vsync: true,
            msaa_samples: 0,
        }
    }
}
