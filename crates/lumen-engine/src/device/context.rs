use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use anyhow::{anyhow, bail, Context, Result};
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasWindowHandle;
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::gl::Gl;

use super::init::ContextInit;

/// A window with a current GL context and its window surface.
///
/// Field order is drop order: the surface and context go before the window
/// they render into.
pub struct GlContext {
    gl: Gl,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl GlContext {
    /// Creates the window together with a framebuffer config that satisfies
    /// `init`, then makes a core-profile context current on it.
    pub fn new(event_loop: &ActiveEventLoop, attributes: WindowAttributes, init: &ContextInit) -> Result<Self> {
        let template = ConfigTemplateBuilder::new()
            .with_depth_size(init.depth_bits)
            .with_stencil_size(init.stencil_bits);
        let wanted_samples = init.msaa_samples;

        let built = catch_no_config(|| {
            DisplayBuilder::new()
                .with_window_attributes(Some(attributes))
                .build(event_loop, template, |configs| pick_config(configs, wanted_samples))
        });
        let Some(built) = built else {
            bail!(
                "no framebuffer config offers {} depth and {} stencil bits",
                init.depth_bits,
                init.stencil_bits
            );
        };
        let (window, config) = built.map_err(|e| anyhow!("failed to create window and GL config: {e}"))?;
        let window = window.context("display builder created no window")?;

        log::debug!(
            "GL config: depth {}, stencil {}, samples {}",
            config.depth_size(),
            config.stencil_size(),
            config.num_samples()
        );

        let display = config.display();
        let raw_window = window
            .window_handle()
            .context("window has no native handle")?
            .as_raw();

        let (major, minor) = init.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(raw_window));

        // SAFETY: the raw window handle stays valid while `window` lives, and
        // `GlContext` drops the context before the window.
        let not_current = unsafe { display.create_context(&config, &context_attributes) }
            .with_context(|| format!("failed to create an OpenGL {major}.{minor} core context"))?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("failed to describe the window surface")?;
        // SAFETY: as above, the surface is dropped before the window.
        let surface = unsafe { display.create_window_surface(&config, &surface_attributes) }
            .context("failed to create the window surface")?;

        let context = not_current
            .make_current(&surface)
            .context("failed to make the GL context current")?;

        let interval = if init.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = surface.set_swap_interval(&context, interval) {
            log::warn!("could not set swap interval {interval:?}: {e}");
        }

        // SAFETY: the context is current on this thread; the loader returns
        // entry points for exactly that context.
        let glow = unsafe {
            glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name).cast())
        };
        let gl: Gl = Rc::new(glow);
        log::info!("OpenGL {}", gl.version_string());

        let ctx = Self {
            gl,
            surface,
            context,
            window,
        };
        let size = ctx.window.inner_size();
        ctx.gl.viewport(0, 0, size.width as i32, size.height as i32);
        Ok(ctx)
    }

    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the surface and the viewport. Zero sizes (minimized) are ignored.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return;
        };
        self.surface.resize(&self.context, width, height);
        self.gl.viewport(0, 0, size.width as i32, size.height as i32);
    }

    pub fn swap_buffers(&self) -> Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("failed to swap buffers")
    }
}

/// Unwind payload raised by the config picker when the backend filtered every
/// config out. `DisplayBuilder::build` requires the picker to return a config,
/// so this is its only exit; [`catch_no_config`] turns it back into `None`.
struct NoMatchingConfig;

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>, wanted_samples: u8) -> Config {
    match best_by_samples(configs, |c| c.num_samples(), wanted_samples) {
        Some(config) => config,
        None => panic::resume_unwind(Box::new(NoMatchingConfig)),
    }
}

/// Runs `f`, returning `None` if the config picker found nothing to pick.
/// Any other unwind keeps propagating.
fn catch_no_config<T>(f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) if payload.is::<NoMatchingConfig>() => None,
        Err(payload) => panic::resume_unwind(payload),
    }
}

fn best_by_samples<T>(items: impl Iterator<Item = T>, samples: impl Fn(&T) -> u8, wanted: u8) -> Option<T> {
    items.reduce(|best, candidate| {
        if sample_preference(samples(&candidate), samples(&best), wanted) {
            candidate
        } else {
            best
        }
    })
}

/// Whether `candidate` samples are a better match for `wanted` than `current`.
///
/// Exact matches win, then the most samples not above `wanted`, then the
/// fewest above it.
fn sample_preference(candidate: u8, current: u8, wanted: u8) -> bool {
    let rank = |samples: u8| -> (u8, u16) {
        if samples == wanted {
            (0, 0)
        } else if samples < wanted {
            (1, u16::from(wanted - samples))
        } else {
            (2, u16::from(samples - wanted))
        }
    };
    rank(candidate) < rank(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_sample_count_wins() {
        assert!(sample_preference(4, 8, 4));
        assert!(!sample_preference(8, 4, 4));
    }

    #[test]
    fn prefers_closest_below_then_closest_above() {
        assert!(sample_preference(2, 0, 4));
        assert!(sample_preference(0, 8, 4));
        assert!(sample_preference(8, 16, 4));
    }

    #[test]
    fn best_config_follows_sample_preference() {
        let best = best_by_samples([0u8, 2, 8, 4, 16].into_iter(), |s| *s, 4);
        assert_eq!(best, Some(4));
    }

    #[test]
    fn empty_config_list_has_no_best() {
        assert_eq!(best_by_samples(std::iter::empty::<u8>(), |s| *s, 4), None);
    }

    #[test]
    fn empty_picker_becomes_none_instead_of_a_panic() {
        let picked = catch_no_config(|| -> u8 { panic::resume_unwind(Box::new(NoMatchingConfig)) });
        assert_eq!(picked, None);
        assert_eq!(catch_no_config(|| 7u8), Some(7));
    }

    #[test]
    #[should_panic(expected = "unrelated")]
    fn other_panics_still_propagate() {
        catch_no_config(|| -> u8 { panic!("unrelated") });
    }

    #[test]
    fn no_multisampling_prefers_single_sample() {
        assert!(sample_preference(0, 4, 0));
        assert!(!sample_preference(4, 0, 0));
    }
}
