use anyhow::{Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{CursorGrabMode, Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, StartCtx};
use crate::device::{ContextInit, GlContext};
use crate::input::platform::winit::{translate_device_event, translate_window_event};
use crate::input::{InputFrame, InputState};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Hide and grab the cursor so mouse motion drives the camera.
    pub capture_cursor: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "LearnOpenGL".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            capture_cursor: true,
        }
    }
}

impl RuntimeConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Runtime commands issued by the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn capture_cursor(&mut self, capture: bool) {
        self.commands.push(Command::CaptureCursor(capture));
    }
}

enum Command {
    CaptureCursor(bool),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs `app` in a single window until it exits or the window closes.
    ///
    /// Errors from window/context creation and from `App::on_start` are
    /// returned once the event loop has stopped.
    pub fn run<A>(config: RuntimeConfig, init: ContextInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = RuntimeState::new(config, init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Everything that exists while the window is alive.
struct ActiveWindow {
    input_state: InputState,
    input_frame: InputFrame,
    clock: FrameClock,
    cursor_captured: bool,
    context: GlContext,
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    // Declared before `active`: the app's GL objects are released while the
    // context is still alive.
    app: A,
    active: Option<ActiveWindow>,

    config: RuntimeConfig,
    init: ContextInit,
    failure: Option<anyhow::Error>,
    exit_requested: bool,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, init: ContextInit, app: A) -> Self {
        Self {
            app,
            active: None,
            config,
            init,
            failure: None,
            exit_requested: false,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.failure = Some(err);
        self.exit_requested = true;
        event_loop.exit();
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let context = GlContext::new(event_loop, attrs, &self.init)?;
        let cursor_captured = self.config.capture_cursor && set_cursor_capture(context.window(), true);

        let active = self.active.insert(ActiveWindow {
            input_state: InputState::default(),
            input_frame: InputFrame::default(),
            clock: FrameClock::new(),
            cursor_captured,
            context,
        });

        let mut runtime_ctx = RuntimeCtx::default();
        let mut ctx = StartCtx {
            window: active.context.window(),
            gl: active.context.gl(),
            runtime: &mut runtime_ctx,
        };
        self.app.on_start(&mut ctx).context("application failed to start")?;

        // Startup may be slow; do not hand the first frame a huge delta.
        active.clock.reset();
        active.context.window().request_redraw();

        self.apply_commands(event_loop, runtime_ctx);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        let mut runtime_ctx = RuntimeCtx::default();
        let time = active.clock.tick();
        let control = {
            let mut ctx = FrameCtx {
                window: active.context.window(),
                gl: active.context.gl(),
                input: &active.input_state,
                input_frame: &active.input_frame,
                time,
                cursor_captured: active.cursor_captured,
                runtime: &mut runtime_ctx,
            };
            self.app.on_frame(&mut ctx)
        };

        // Per-frame deltas were consumed by this frame.
        active.input_frame.clear();

        active.context.window().pre_present_notify();
        if let Err(e) = active.context.swap_buffers() {
            self.fail(event_loop, e);
            return;
        }

        if control == AppControl::Exit {
            runtime_ctx.exit();
        }
        self.apply_commands(event_loop, runtime_ctx);
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, ctx: RuntimeCtx) {
        for cmd in ctx.commands {
            match cmd {
                Command::CaptureCursor(capture) => {
                    if let Some(active) = self.active.as_mut() {
                        active.cursor_captured = set_cursor_capture(active.context.window(), capture);
                    }
                }
                Command::Exit => self.exit_requested = true,
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() || self.exit_requested {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw: every demo animates or follows the camera.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(active) = &self.active {
            active.context.window().request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let Some(active) = self.active.as_mut() else {
            return;
        };

        if let Some(ev) = translate_window_event(active.context.window(), &event) {
            active.input_state.apply_event(&mut active.input_frame, ev);
        }

        if self.app.on_window_event(&event) == AppControl::Exit {
            self.exit_requested = true;
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                self.exit_requested = true;
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                active.context.resize(*size);
                active.context.window().request_redraw();
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let size = active.context.window().inner_size();
                active.context.resize(size);
                active.context.window().request_redraw();
            }

            // Some platforms drop the grab when focus leaves.
            WindowEvent::Focused(true) if active.cursor_captured => {
                active.cursor_captured = set_cursor_capture(active.context.window(), true);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.cursor_captured {
            return;
        }

        if let Some(ev) = translate_device_event(&event) {
            active.input_state.apply_event(&mut active.input_frame, ev);
        }
    }
}

/// Grabs (or releases) and hides (or shows) the cursor. Returns whether the
/// cursor ended up captured.
fn set_cursor_capture(window: &Window, capture: bool) -> bool {
    if !capture {
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
            log::warn!("failed to release cursor: {e}");
        }
        window.set_cursor_visible(true);
        return false;
    }

    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked));

    match grabbed {
        Ok(()) => {
            window.set_cursor_visible(false);
            true
        }
        Err(e) => {
            log::warn!("cursor capture unavailable, falling back to cursor positions: {e}");
            false
        }
    }
}
