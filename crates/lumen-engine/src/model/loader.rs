//! glTF import into drawable meshes.
//!
//! Every node's primitives are flattened into one mesh list with the node's
//! world transform baked into the vertices. Materials map onto the numbered
//! sampler scheme: base color is diffuse, metallic-roughness is specular,
//! normal maps are normal. Occlusion has no slot and is ignored.

use std::collections::HashSet;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::gl::{Gl, PixelFormat};
use crate::mesh::{MaterialTexture, Mesh, TextureKind, Vertex, MAX_BONE_INFLUENCE};
use crate::texture::{ImageData, Texture2d, TextureOptions};

use super::cache::TextureCache;
use super::error::ModelError;

/// Attribute streams of one primitive, before transformation.
#[derive(Debug, Default, Clone)]
pub(crate) struct PrimitiveData {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub tangents: Option<Vec<Vec4>>,
    pub joints: Option<Vec<[u16; 4]>>,
    pub weights: Option<Vec<[f32; 4]>>,
    pub indices: Option<Vec<u32>>,
}

/// Imports `path` and builds one mesh per triangle primitive.
pub(crate) fn load_meshes(gl: &Gl, path: &Path, cache: &mut TextureCache) -> Result<Vec<Mesh>, ModelError> {
    let (document, buffers, images) = gltf::import(path).map_err(|source| ModelError::Import {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!(
        "imported `{}`: {} meshes, {} images",
        path.display(),
        document.meshes().len(),
        images.len()
    );

    let mut ctx = LoadContext {
        gl,
        path,
        buffers: &buffers,
        images: &images,
        cache,
    };

    let mut stack: Vec<(gltf::Node<'_>, Mat4)> = root_nodes(&document)
        .into_iter()
        .map(|node| (node, Mat4::IDENTITY))
        .collect();

    let mut meshes = Vec::new();
    while let Some((node, parent)) = stack.pop() {
        let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if let Some(built) = ctx.load_primitive(&primitive, world)? {
                    meshes.push(built);
                }
            }
        }
        stack.extend(node.children().map(|child| (child, world)));
    }

    if meshes.is_empty() {
        return Err(ModelError::Empty { path: path.to_path_buf() });
    }
    Ok(meshes)
}

/// Nodes of the default scene, or every parentless node if there is no scene.
fn root_nodes(document: &gltf::Document) -> Vec<gltf::Node<'_>> {
    if let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) {
        return scene.nodes().collect();
    }
    let children: HashSet<usize> = document
        .nodes()
        .flat_map(|node| node.children().map(|child| child.index()))
        .collect();
    document.nodes().filter(|node| !children.contains(&node.index())).collect()
}

struct LoadContext<'a> {
    gl: &'a Gl,
    path: &'a Path,
    buffers: &'a [gltf::buffer::Data],
    images: &'a [gltf::image::Data],
    cache: &'a mut TextureCache,
}

impl LoadContext<'_> {
    fn load_primitive(&mut self, primitive: &gltf::Primitive<'_>, world: Mat4) -> Result<Option<Mesh>, ModelError> {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::warn!(
                "`{}`: skipping primitive {} with mode {:?}",
                self.path.display(),
                primitive.index(),
                primitive.mode()
            );
            return Ok(None);
        }

        let buffers = self.buffers;
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            log::warn!("`{}`: skipping primitive without positions", self.path.display());
            return Ok(None);
        };
        let data = PrimitiveData {
            positions: positions.map(Vec3::from).collect(),
            normals: reader.read_normals().map(|n| n.map(Vec3::from).collect()),
            tex_coords: reader.read_tex_coords(0).map(|t| t.into_f32().map(Vec2::from).collect()),
            tangents: reader.read_tangents().map(|t| t.map(Vec4::from).collect()),
            joints: reader.read_joints(0).map(|j| j.into_u16().collect()),
            weights: reader.read_weights(0).map(|w| w.into_f32().collect()),
            indices: reader.read_indices().map(|i| i.into_u32().collect()),
        };

        let (vertices, indices) = build_geometry(data, world);
        let textures = self.material_textures(&primitive.material())?;

        Ok(Some(Mesh::new(self.gl, vertices, indices, textures)?))
    }

    fn material_textures(&mut self, material: &gltf::Material<'_>) -> Result<Vec<MaterialTexture>, ModelError> {
        let pbr = material.pbr_metallic_roughness();
        let slots = [
            (TextureKind::Diffuse, pbr.base_color_texture().map(|info| info.texture())),
            (TextureKind::Specular, pbr.metallic_roughness_texture().map(|info| info.texture())),
            (TextureKind::Normal, material.normal_texture().map(|n| n.texture())),
        ];

        let mut textures = Vec::new();
        for (kind, texture) in slots {
            let Some(texture) = texture else {
                continue;
            };
            let image = texture.source();
            let key = image_key(self.path, &image);

            let Some(data) = self.images.get(image.index()) else {
                continue;
            };
            let Some(pixels) = convert_image(data) else {
                log::warn!("`{key}`: unsupported pixel format {:?}, texture skipped", data.format);
                continue;
            };

            let gl = self.gl;
            let shared = self.cache.get_or_try_insert(&key, || {
                Texture2d::from_image(gl, &pixels, &TextureOptions::smooth().with_flip(false))
            })?;
            textures.push(MaterialTexture::new(Rc::clone(&shared), kind, key));
        }
        Ok(textures)
    }
}

/// Cache key: the resolved file for external images, `model#imageN` for embedded ones.
fn image_key(model: &Path, image: &gltf::Image<'_>) -> String {
    match image.source() {
        gltf::image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
            let dir = model.parent().map(Path::to_path_buf).unwrap_or_default();
            dir.join(uri).display().to_string()
        }
        _ => format!("{}#image{}", model.display(), image.index()),
    }
}

/// 8-bit images map straight onto GL formats; deeper ones are not supported.
fn convert_image(data: &gltf::image::Data) -> Option<ImageData> {
    use gltf::image::Format;

    let format = match data.format {
        Format::R8 => PixelFormat::Red,
        Format::R8G8 => PixelFormat::Rg,
        Format::R8G8B8 => PixelFormat::Rgb,
        Format::R8G8B8A8 => PixelFormat::Rgba,
        _ => return None,
    };
    Some(ImageData {
        width: data.width,
        height: data.height,
        format,
        pixels: data.pixels.clone(),
    })
}

/// Applies `world` and fills in whatever the file left out.
pub(crate) fn build_geometry(data: PrimitiveData, world: Mat4) -> (Vec<Vertex>, Vec<u32>) {
    let count = data.positions.len();
    let indices = data.indices.unwrap_or_else(|| (0..count as u32).collect());
    let normals = data
        .normals
        .filter(|n| n.len() == count)
        .unwrap_or_else(|| smooth_normals(&data.positions, &indices));

    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let linear = Mat3::from_mat4(world);

    let vertices = (0..count)
        .map(|i| {
            let normal = (normal_matrix * normals[i]).normalize_or_zero();
            let uv = data
                .tex_coords
                .as_ref()
                .and_then(|t| t.get(i).copied())
                .unwrap_or(Vec2::ZERO);
            let mut vertex = Vertex::new(world.transform_point3(data.positions[i]), normal, uv);

            if let Some(t) = data.tangents.as_ref().and_then(|t| t.get(i)) {
                let tangent = (linear * t.truncate()).normalize_or_zero();
                vertex = vertex.with_tangent_frame(tangent, normal.cross(tangent) * t.w);
            }

            if let (Some(joints), Some(weights)) = (
                data.joints.as_ref().and_then(|j| j.get(i)),
                data.weights.as_ref().and_then(|w| w.get(i)),
            ) {
                for slot in 0..MAX_BONE_INFLUENCE {
                    if weights[slot] > 0.0 {
                        vertex.bone_ids[slot] = i32::from(joints[slot]);
                        vertex.bone_weights[slot] = weights[slot];
                    }
                }
            }
            vertex
        })
        .collect();

    (vertices, indices)
}

/// Area-weighted vertex normals.
fn smooth_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        for i in [a, b, c] {
            normals[i] += face;
        }
    }
    normals.into_iter().map(|n| n.normalize_or(Vec3::Y)).collect()
}
