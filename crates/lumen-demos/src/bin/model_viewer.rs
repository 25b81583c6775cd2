//! Loads a glTF model and draws it with its diffuse and specular maps.
//!
//! Usage: `model_viewer [model.gltf]`, relative to the asset directory.
//! F toggles wireframe.

use anyhow::Result;
use glam::{Mat4, Vec3};

use lumen_demos::{camera_for, handle_common_input, load_program, model_argument, model_or_cube, run_demo};
use lumen_engine::camera::FlyControls;
use lumen_engine::core::{App, AppControl, FrameCtx, StartCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::{Capability, ClearFlags, PolygonMode};
use lumen_engine::input::Key;
use lumen_engine::model::Model;
use lumen_engine::shader::Program;

const CLEAR_COLOR: [f32; 4] = [0.05, 0.05, 0.05, 1.0];
const DEFAULT_MODEL: &str = "models/backpack/backpack.gltf";
const LIGHT_DIR: Vec3 = Vec3::new(-0.3, -1.0, -0.5);
const MSAA_SAMPLES: u8 = 4;

struct Scene {
    program: Program,
    model: Model,
}

struct ModelViewer {
    model_path: String,
    controls: FlyControls,
    wireframe: bool,
    scene: Option<Scene>,
}

impl App for ModelViewer {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        ctx.gl.set_capability(Capability::DepthTest, true);
        ctx.gl.set_capability(Capability::Multisample, true);

        let model = model_or_cube(ctx.gl, &self.model_path)?;
        for (i, mesh) in model.meshes().iter().enumerate() {
            if let Err(e) = mesh.check_sampler_names() {
                log::warn!("mesh {i}: {e}");
            }
        }
        self.controls.camera = camera_for(&model);

        self.scene = Some(Scene {
            program: load_program(ctx.gl, "model.vs", "model.fs", None)?,
            model,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if handle_common_input(ctx, &mut self.controls) == AppControl::Exit {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::F) {
            self.wireframe = !self.wireframe;
            ctx.gl.polygon_mode(if self.wireframe { PolygonMode::Line } else { PolygonMode::Fill });
        }
        let Some(scene) = &self.scene else {
            return AppControl::Continue;
        };

        ctx.clear(CLEAR_COLOR, ClearFlags::COLOR_DEPTH);

        let camera = &self.controls.camera;
        let program = &scene.program;
        program.use_program();
        program.set_mat4("projection", &camera.projection(ctx.aspect_ratio()));
        program.set_mat4("view", &camera.view_matrix());
        program.set_mat4("model", &Mat4::IDENTITY);
        program.set_vec3("viewPos", camera.position);
        program.set_vec3("lightDir", LIGHT_DIR);
        scene.model.draw(program);

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let app = ModelViewer {
        model_path: model_argument(DEFAULT_MODEL),
        controls: FlyControls::default(),
        wireframe: false,
        scene: None,
    };
    let init = ContextInit {
        msaa_samples: MSAA_SAMPLES,
        ..ContextInit::default()
    };
    run_demo("lumen: model viewer", init, app)
}
