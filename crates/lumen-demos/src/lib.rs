//! Helpers shared by the demo binaries: asset lookup, shader loading with
//! logged fallbacks, and the common per-frame controls.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};

use glam::Vec3;

use lumen_engine::camera::{Camera, FlyControls};
use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::Gl;
use lumen_engine::input::Key;
use lumen_engine::logging::{init_logging, LoggingConfig};
use lumen_engine::mesh::{primitives, MaterialTexture, Mesh, TextureKind};
use lumen_engine::model::Model;
use lumen_engine::shader::Program;
use lumen_engine::texture::{Texture2d, TextureOptions};
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Environment variable overriding the asset directory.
pub const ASSETS_ENV: &str = "LUMEN_ASSETS";

/// Magenta marks textures that failed to load.
const MISSING_TEXTURE_RGBA: [u8; 4] = [255, 0, 255, 255];

/// Initializes logging and runs `app` in an 800x600 window titled `title`.
pub fn run_demo<A: App + 'static>(title: &str, init: ContextInit, app: A) -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting `{title}` (W/A/S/D move, mouse looks, wheel zooms, Tab frees the cursor, Esc quits)");
    Runtime::run(RuntimeConfig::default().with_title(title), init, app)
}

/// Root of textures and models: `$LUMEN_ASSETS` if set, `assets/` otherwise.
pub fn assets_dir() -> PathBuf {
    assets_dir_from(std::env::var_os(ASSETS_ENV).map(PathBuf::from))
}

fn assets_dir_from(overridden: Option<PathBuf>) -> PathBuf {
    overridden
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from("assets"))
}

pub fn asset(relative: impl AsRef<Path>) -> PathBuf {
    assets_dir().join(relative)
}

/// GLSL sources ship with this crate.
pub fn shader_path(file: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders").join(file)
}

/// Builds a program from files under `shaders/`.
///
/// Unreadable files are an error. Compile or link failures are already logged
/// by the program; the demo keeps running with an inert program.
pub fn load_program(gl: &Gl, vertex: &str, fragment: &str, geometry: Option<&str>) -> Result<Program> {
    let geometry = geometry.map(shader_path);
    let program = Program::from_files(gl, shader_path(vertex), shader_path(fragment), geometry.as_deref())
        .with_context(|| format!("failed to read shaders `{vertex}` / `{fragment}`"))?;
    if !program.is_linked() {
        log::warn!("program `{}` is inert; its draws will not render", program.name());
    }
    Ok(program)
}

/// Loads `relative` from the asset directory, or substitutes a solid magenta
/// texture after logging why.
pub fn texture_or_fallback(gl: &Gl, relative: &str, options: &TextureOptions) -> Result<Rc<Texture2d>> {
    let path = asset(relative);
    match Texture2d::from_path(gl, &path, options) {
        Ok(texture) => Ok(Rc::new(texture)),
        Err(e) => {
            log::error!("{e}; using a placeholder for `{relative}`");
            let texture = Texture2d::solid(gl, MISSING_TEXTURE_RGBA).context("failed to create placeholder texture")?;
            Ok(Rc::new(texture))
        }
    }
}

/// A unit cube carrying `textures`.
pub fn cube_mesh(gl: &Gl, textures: Vec<MaterialTexture>) -> Result<Mesh> {
    let (vertices, indices) = primitives::cube();
    Mesh::new(gl, vertices, indices, textures).context("failed to create cube mesh")
}

/// A diffuse material entry for `texture`, named after its asset path.
pub fn diffuse(texture: Rc<Texture2d>, relative: &str) -> MaterialTexture {
    MaterialTexture::new(texture, TextureKind::Diffuse, relative)
}

/// Loads the glTF model at `relative`, or a grey cube after logging why.
pub fn model_or_cube(gl: &Gl, relative: &str) -> Result<Model> {
    match Model::load(gl, asset(relative)) {
        Ok(model) => Ok(model),
        Err(e) => {
            log::error!("{e:#}; drawing a cube instead");
            let grey = Texture2d::solid(gl, [180, 180, 180, 255]).context("failed to create cube texture")?;
            let cube = cube_mesh(gl, vec![diffuse(Rc::new(grey), "generated")])?;
            Ok(Model::from_meshes(vec![cube]))
        }
    }
}

/// The model path from the first command-line argument, else `default`.
pub fn model_argument(default: &str) -> String {
    std::env::args().nth(1).unwrap_or_else(|| default.to_string())
}

/// A camera looking down -Z at the model's bounds from far enough to see all of it.
pub fn camera_for(model: &Model) -> Camera {
    match model.bounds() {
        Some((min, max)) => Camera::new(framing_position(min, max)),
        None => Camera::default(),
    }
}

fn framing_position(min: Vec3, max: Vec3) -> Vec3 {
    let center = (min + max) * 0.5;
    let radius = ((max - min).length() * 0.5).max(0.5);
    center + Vec3::Z * radius * 2.5
}

/// Escape quits, Tab toggles cursor capture, then the camera takes the rest.
pub fn handle_common_input(ctx: &mut FrameCtx<'_>, controls: &mut FlyControls) -> AppControl {
    if ctx.input_frame.key_pressed(Key::Escape) {
        return AppControl::Exit;
    }
    if ctx.input_frame.key_pressed(Key::Tab) {
        ctx.runtime.capture_cursor(!ctx.cursor_captured);
    }

    controls.update(ctx.input, ctx.input_frame, ctx.time.dt, ctx.cursor_captured);
    AppControl::Continue
}
