//! A model drawn normally, then again through a geometry shader that emits
//! one yellow line per vertex normal.
//!
//! Usage: `normal_visualization [model.gltf]`, relative to the asset directory.

use anyhow::Result;
use glam::{Mat4, Vec3};

use lumen_demos::{camera_for, handle_common_input, load_program, model_argument, model_or_cube, run_demo};
use lumen_engine::camera::FlyControls;
use lumen_engine::core::{App, AppControl, FrameCtx, StartCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::{Capability, ClearFlags};
use lumen_engine::model::Model;
use lumen_engine::shader::Program;

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const DEFAULT_MODEL: &str = "models/backpack/backpack.gltf";
const LIGHT_DIR: Vec3 = Vec3::new(-0.3, -1.0, -0.5);

struct Scene {
    shaded: Program,
    normals: Program,
    model: Model,
}

struct NormalVisualization {
    model_path: String,
    controls: FlyControls,
    scene: Option<Scene>,
}

impl App for NormalVisualization {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        ctx.gl.set_capability(Capability::DepthTest, true);

        let model = model_or_cube(ctx.gl, &self.model_path)?;
        self.controls.camera = camera_for(&model);

        self.scene = Some(Scene {
            shaded: load_program(ctx.gl, "model.vs", "model.fs", None)?,
            normals: load_program(
                ctx.gl,
                "normal_visualization.vs",
                "normal_visualization.fs",
                Some("normal_visualization.gs"),
            )?,
            model,
        });
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if handle_common_input(ctx, &mut self.controls) == AppControl::Exit {
            return AppControl::Exit;
        }
        let Some(scene) = &self.scene else {
            return AppControl::Continue;
        };

        ctx.clear(CLEAR_COLOR, ClearFlags::COLOR_DEPTH);

        let camera = &self.controls.camera;
        let view = camera.view_matrix();
        let projection = camera.projection(ctx.aspect_ratio());

        let shaded = &scene.shaded;
        shaded.use_program();
        shaded.set_mat4("projection", &projection);
        shaded.set_mat4("view", &view);
        shaded.set_mat4("model", &Mat4::IDENTITY);
        shaded.set_vec3("viewPos", camera.position);
        shaded.set_vec3("lightDir", LIGHT_DIR);
        scene.model.draw(shaded);

        // Same geometry; the geometry stage turns each triangle into normal lines.
        let normals = &scene.normals;
        normals.use_program();
        normals.set_mat4("projection", &projection);
        normals.set_mat4("view", &view);
        normals.set_mat4("model", &Mat4::IDENTITY);
        scene.model.draw(normals);

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let app = NormalVisualization {
        model_path: model_argument(DEFAULT_MODEL),
        controls: FlyControls::default(),
        scene: None,
    };
    run_demo("lumen: normal visualization", ContextInit::default(), app)
}
