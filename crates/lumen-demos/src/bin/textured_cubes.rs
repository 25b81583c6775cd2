//! Ten cubes, each sampling two blended textures bound through the mesh's
//! `material.texture_diffuseN` samplers.

use anyhow::Result;
use glam::{Mat4, Vec3};

use lumen_demos::{cube_mesh, diffuse, handle_common_input, load_program, run_demo, texture_or_fallback};
use lumen_engine::camera::{Camera, FlyControls};
use lumen_engine::core::{App, AppControl, FrameCtx, StartCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::{Capability, ClearFlags};
use lumen_engine::mesh::Mesh;
use lumen_engine::shader::Program;
use lumen_engine::texture::TextureOptions;

const CLEAR_COLOR: [f32; 4] = [0.2, 0.3, 0.3, 1.0];
const CONTAINER: &str = "textures/container.jpg";
const OVERLAY: &str = "textures/mouse.png";
const MIX_AMOUNT: f32 = 0.2;

const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

struct Scene {
    program: Program,
    cube: Mesh,
}

struct TexturedCubes {
    controls: FlyControls,
    scene: Option<Scene>,
}

/// Cube `index` is rotated by `20 * index` degrees about a fixed tilted axis.
fn cube_model(index: usize, position: Vec3) -> Mat4 {
    let axis = Vec3::new(1.0, 0.3, 0.5).normalize();
    let angle = (20.0 * index as f32).to_radians();
    Mat4::from_translation(position) * Mat4::from_axis_angle(axis, angle)
}

impl App for TexturedCubes {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        ctx.gl.set_capability(Capability::DepthTest, true);

        let container = texture_or_fallback(ctx.gl, CONTAINER, &TextureOptions::pixelated())?;
        let overlay = texture_or_fallback(ctx.gl, OVERLAY, &TextureOptions::smooth())?;
        let cube = cube_mesh(
            ctx.gl,
            vec![diffuse(container, CONTAINER), diffuse(overlay, OVERLAY)],
        )?;

        self.scene = Some(Scene {
            program: load_program(ctx.gl, "textured.vs", "blended_textures.fs", None)?,
            cube,
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
        let program = &scene.program;
        program.use_program();
        program.set_float("mixAmount", MIX_AMOUNT);
        program.set_mat4("projection", &camera.projection(ctx.aspect_ratio()));
        program.set_mat4("view", &camera.view_matrix());

        for (i, &position) in CUBE_POSITIONS.iter().enumerate() {
            program.set_mat4("model", &cube_model(i, position));
            scene.cube.draw(program);
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let app = TexturedCubes {
        controls: FlyControls::new(Camera::default()),
        scene: None,
    };
    run_demo("lumen: textured cubes", ContextInit::default(), app)
}
