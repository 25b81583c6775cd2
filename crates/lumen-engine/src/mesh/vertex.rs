use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::gl::{AttribKind, VertexAttribute};

/// Bones that may influence one vertex.
pub const MAX_BONE_INFLUENCE: usize = 4;

/// Interleaved vertex as stored in a mesh's vertex buffer.
///
/// The field order and `repr(C)` fix the byte layout shaders read:
/// position 0, normal 12, tex_coords 24, tangent 32, bitangent 44,
/// bone_ids 56, bone_weights 72; 88 bytes per vertex.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
    pub tangent: Vec3,
    pub bitangent: Vec3,
    pub bone_ids: [i32; MAX_BONE_INFLUENCE],
    pub bone_weights: [f32; MAX_BONE_INFLUENCE],
}

impl Vertex {
    /// Bone slot that references no bone.
    pub const NO_BONE: i32 = -1;

    pub const STRIDE: i32 = size_of::<Vertex>() as i32;

    /// Shader locations 0..=6 in field order. Bone ids stay integers.
    pub const ATTRIBUTES: [VertexAttribute; 7] = [
        attr(0, 3, AttribKind::Float, offset_of!(Vertex, position)),
        attr(1, 3, AttribKind::Float, offset_of!(Vertex, normal)),
        attr(2, 2, AttribKind::Float, offset_of!(Vertex, tex_coords)),
        attr(3, 3, AttribKind::Float, offset_of!(Vertex, tangent)),
        attr(4, 3, AttribKind::Float, offset_of!(Vertex, bitangent)),
        attr(5, 4, AttribKind::Int, offset_of!(Vertex, bone_ids)),
        attr(6, 4, AttribKind::Float, offset_of!(Vertex, bone_weights)),
    ];

    /// Unskinned vertex without a tangent frame.
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
            tangent: Vec3::ZERO,
            bitangent: Vec3::ZERO,
            bone_ids: [Self::NO_BONE; MAX_BONE_INFLUENCE],
            bone_weights: [0.0; MAX_BONE_INFLUENCE],
        }
    }

    pub fn with_tangent_frame(mut self, tangent: Vec3, bitangent: Vec3) -> Self {
        self.tangent = tangent;
        self.bitangent = bitangent;
        self
    }
}

const fn attr(location: u32, components: i32, kind: AttribKind, offset: usize) -> VertexAttribute {
    VertexAttribute {
        location,
        components,
        kind,
        offset: offset as i32,
    }
}
