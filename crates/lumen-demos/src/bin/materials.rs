//! A cube lit by an orbiting point light through Phong material uniforms.

use anyhow::Result;
use glam::{Mat4, Vec3};

use lumen_demos::{cube_mesh, handle_common_input, load_program, run_demo};
use lumen_engine::camera::{Camera, FlyControls};
use lumen_engine::core::{App, AppControl, FrameCtx, StartCtx};
use lumen_engine::device::ContextInit;
use lumen_engine::gl::{Capability, ClearFlags};
use lumen_engine::mesh::Mesh;
use lumen_engine::shader::Program;

const CLEAR_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
const LAMP_SCALE: f32 = 0.2;
const ORBIT_RADIUS: f32 = 2.0;
const LIGHT_HEIGHT: f32 = 1.0;

/// Cyan plastic.
const MATERIAL_AMBIENT: Vec3 = Vec3::new(0.0, 0.1, 0.06);
const MATERIAL_DIFFUSE: Vec3 = Vec3::new(0.0, 0.509_803_92, 0.509_803_92);
const MATERIAL_SPECULAR: Vec3 = Vec3::splat(0.501_960_78);
const MATERIAL_SHININESS: f32 = 32.0;

struct Scene {
    lighting: Program,
    lamp: Program,
    cube: Mesh,
}

struct MaterialsDemo {
    controls: FlyControls,
    scene: Option<Scene>,
}

/// The light circles the origin at a fixed height, one radian per second.
fn light_position(elapsed: f32) -> Vec3 {
    Vec3::new(elapsed.sin() * ORBIT_RADIUS, LIGHT_HEIGHT, elapsed.cos() * ORBIT_RADIUS)
}

impl App for MaterialsDemo {
    fn on_start(&mut self, ctx: &mut StartCtx<'_>) -> Result<()> {
        ctx.gl.set_capability(Capability::DepthTest, true);

        self.scene = Some(Scene {
            lighting: load_program(ctx.gl, "materials.vs", "materials.fs", None)?,
            lamp: load_program(ctx.gl, "light_cube.vs", "light_cube.fs", None)?,
            cube: cube_mesh(ctx.gl, Vec::new())?,
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
        let light_pos = light_position(ctx.time.elapsed);

        let lighting = &scene.lighting;
        lighting.use_program();
        lighting.set_vec3("light.position", light_pos);
        lighting.set_vec3("viewPos", camera.position);
        lighting.set_vec3("light.ambient", Vec3::ONE);
        lighting.set_vec3("light.diffuse", Vec3::ONE);
        lighting.set_vec3("light.specular", Vec3::ONE);
        lighting.set_vec3("material.ambient", MATERIAL_AMBIENT);
        lighting.set_vec3("material.diffuse", MATERIAL_DIFFUSE);
        lighting.set_vec3("material.specular", MATERIAL_SPECULAR);
        lighting.set_float("material.shininess", MATERIAL_SHININESS);
        lighting.set_mat4("projection", &projection);
        lighting.set_mat4("view", &view);
        lighting.set_mat4("model", &Mat4::IDENTITY);
        scene.cube.draw(lighting);

        let lamp = &scene.lamp;
        lamp.use_program();
        lamp.set_mat4("projection", &projection);
        lamp.set_mat4("view", &view);
        lamp.set_mat4(
            "model",
            &(Mat4::from_translation(light_pos) * Mat4::from_scale(Vec3::splat(LAMP_SCALE))),
        );
        lamp.set_vec3("lightColor", Vec3::ONE);
        scene.cube.draw(lamp);

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    let app = MaterialsDemo {
        controls: FlyControls::new(Camera::default()),
        scene: None,
    };
    run_demo("lumen: materials", ContextInit::default(), app)
}
