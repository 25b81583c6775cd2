//! Two cubes on a floor, outlined by redrawing them scaled up where the
//! stencil buffer was not written.

use anyhow::Result;
use glam::{Mat4, Vec3};

use lumen_demos::{cube_mesh, diffuse, handle_common_input, load_program, run_demo, texture_or_fallback};
use lumen_engine::camera::{Camera, FlyControls};
use lumen_engine::core::{App, AppControl, FrameCtx, StartCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::{Capability, ClearFlags, CompareFunc, Gl, StencilAction};
use lumen_engine::mesh::{primitives, Mesh};
use lumen_engine::shader::Program;
use lumen_engine::texture::TextureOptions;

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const CUBE_TEXTURE: &str = "textures/marble.jpg";
const FLOOR_TEXTURE: &str = "textures/metal.png";
const CUBE_POSITIONS: [Vec3; 2] = [Vec3::new(-1.0, 0.0, -1.0), Vec3::new(2.0, 0.0, 0.0)];
const OUTLINE_SCALE: f32 = 1.1;
const OUTLINE_COLOR: Vec3 = Vec3::new(0.04, 0.28, 0.26);

struct Scene {
    textured: Program,
    outline: Program,
    cube: Mesh,
    floor: Mesh,
}

struct StencilOutline {
    controls: FlyControls,
    scene: Option<Scene>,
}

impl Scene {
    fn draw_cubes(&self, program: &Program, scale: f32) {
        for position in CUBE_POSITIONS {
            let model = Mat4::from_translation(position) * Mat4::from_scale(Vec3::splat(scale));
            program.set_mat4("model", &model);
            self.cube.draw(program);
        }
    }

    fn draw(&self, gl: &Gl, view: &Mat4, projection: &Mat4) {
        self.outline.use_program();
        self.outline.set_mat4("view", view);
        self.outline.set_mat4("projection", projection);
        self.outline.set_vec3("outlineColor", OUTLINE_COLOR);

        self.textured.use_program();
        self.textured.set_mat4("view", view);
        self.textured.set_mat4("projection", projection);

        // The floor must not mark the stencil buffer.
        gl.stencil_mask(0x00);
        self.textured.set_mat4("model", &Mat4::IDENTITY);
        self.floor.draw(&self.textured);

        // Every cube fragment writes 1.
        gl.stencil_func(CompareFunc::Always, 1, 0xFF);
        gl.stencil_mask(0xFF);
        self.draw_cubes(&self.textured, 1.0);

        // Scaled cubes only where the stencil is not 1, on top of everything.
        gl.stencil_func(CompareFunc::NotEqual, 1, 0xFF);
        gl.stencil_mask(0x00);
        gl.set_capability(Capability::DepthTest, false);
        self.outline.use_program();
        self.draw_cubes(&self.outline, OUTLINE_SCALE);

        // Leave the state as the next clear expects it.
        gl.stencil_mask(0xFF);
        gl.stencil_func(CompareFunc::Always, 0, 0xFF);
        gl.set_capability(Capability::DepthTest, true);
    }
}

impl App for StencilOutline {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        let gl = ctx.gl;
        gl.set_capability(Capability::DepthTest, true);
        gl.depth_func(CompareFunc::Less);
        gl.set_capability(Capability::StencilTest, true);
        gl.stencil_func(CompareFunc::NotEqual, 1, 0xFF);
        gl.stencil_op(StencilAction::Keep, StencilAction::Keep, StencilAction::Replace);

        let marble = texture_or_fallback(gl, CUBE_TEXTURE, &TextureOptions::smooth())?;
        let metal = texture_or_fallback(gl, FLOOR_TEXTURE, &TextureOptions::smooth())?;

        let (floor_vertices, floor_indices) = primitives::plane(5.0, -0.5, 2.0);
        let floor = Mesh::new(gl, floor_vertices, floor_indices, vec![diffuse(metal, FLOOR_TEXTURE)])?;

        self.scene = Some(Scene {
            textured: load_program(gl, "textured.vs", "textured.fs", None)?,
            outline: load_program(gl, "textured.vs", "single_color.fs", None)?,
            cube: cube_mesh(gl, vec![diffuse(marble, CUBE_TEXTURE)])?,
            floor,
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

        ctx.clear(CLEAR_COLOR, ClearFlags::ALL);

        let camera = &self.controls.camera;
        scene.draw(ctx.gl, &camera.view_matrix(), &camera.projection(ctx.aspect_ratio()));

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let app = StencilOutline {
        controls: FlyControls::new(Camera::default()),
        scene: None,
    };
    run_demo("lumen: stencil outline", ContextInit::default(), app)
}
