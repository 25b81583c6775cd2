//! Procedural geometry for the demos.
//!
//! Every face is a quad of four vertices with its own normal and tangent
//! frame, wound counter-clockwise when seen from outside.

use glam::{Vec2, Vec3};

use super::vertex::Vertex;

/// Unit cube centred on the origin: 24 vertices, 36 indices, UVs 0..1 per face.
pub fn cube() -> (Vec<Vertex>, Vec<u32>) {
    // (normal, tangent); bitangent = normal x tangent keeps the winding outward.
    const FACES: [(Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_X, Vec3::Z),
        (Vec3::Y, Vec3::X),
        (Vec3::NEG_Y, Vec3::X),
        (Vec3::Z, Vec3::X),
        (Vec3::NEG_Z, Vec3::NEG_X),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, tangent) in FACES {
        let bitangent = normal.cross(tangent);
        push_quad(&mut vertices, &mut indices, normal * 0.5, normal, tangent * 0.5, bitangent * 0.5, Vec2::ONE);
    }
    (vertices, indices)
}

/// Horizontal square at height `y` facing +Y, spanning `±half_extent` on X and Z.
/// Texture coordinates run `0..uv_repeat` so a repeating sampler tiles it.
pub fn plane(half_extent: f32, y: f32, uv_repeat: f32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::with_capacity(4);
    let mut indices = Vec::with_capacity(6);
    push_quad(
        &mut vertices,
        &mut indices,
        Vec3::new(0.0, y, 0.0),
        Vec3::Y,
        Vec3::X * half_extent,
        Vec3::NEG_Z * half_extent,
        Vec2::splat(uv_repeat),
    );
    (vertices, indices)
}

fn push_quad(
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    center: Vec3,
    normal: Vec3,
    half_u: Vec3,
    half_v: Vec3,
    uv_scale: Vec2,
) {
    let base = vertices.len() as u32;
    let tangent = half_u.normalize_or_zero();
    let bitangent = half_v.normalize_or_zero();

    for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
        let position = center + half_u * su + half_v * sv;
        let uv = Vec2::new((su + 1.0) * 0.5, (sv + 1.0) * 0.5) * uv_scale;
        vertices.push(Vertex::new(position, normal, uv).with_tangent_frame(tangent, bitangent));
    }

    indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
}
