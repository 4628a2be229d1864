//! glTF 2.0 importer (.gltf / .glb) producing a [`Scene`].

use std::path::Path;

use anyhow::{Result, anyhow, bail};
use corelib::{Mat4, Vec3};
use gltf::mesh::Mode;

use crate::{
    postprocess::PostProcess,
    scene::{Material, Mesh, NodeId, ROOT, Scene},
};

/// Load a glTF file and its buffers. Images are referenced, not decoded.
pub fn load_gltf(path: &Path, steps: PostProcess) -> Result<Scene> {
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)
        .map_err(|e| anyhow!("Failed to open glTF file '{}': {}", path.display(), e))?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)
        .map_err(|e| anyhow!("Failed to load buffers of '{}': {}", path.display(), e))?;

    let scene = build_scene(&document, &buffers, steps)?;
    log::debug!(
        "glTF '{}': {} nodes, {} meshes, {} materials",
        path.display(),
        scene.nodes.len(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}

struct Context<'a> {
    buffers: &'a [gltf::buffer::Data],
    steps: PostProcess,
    /// Slot appended on demand for primitives without a material.
    default_material: Option<usize>,
}

fn build_scene(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    steps: PostProcess,
) -> Result<Scene> {
    let mut scene = Scene::new();
    scene.materials = document.materials().map(convert_material).collect();

    let roots: Vec<gltf::Node<'_>> = match document.default_scene() {
        Some(s) => s.nodes().collect(),
        None => document.scenes().flat_map(|s| s.nodes()).collect(),
    };

    let mut ctx = Context {
        buffers,
        steps,
        default_material: None,
    };
    for node in roots {
        import_node(&mut scene, &mut ctx, ROOT, node)?;
    }
    Ok(scene)
}

fn import_node(
    scene: &mut Scene,
    ctx: &mut Context<'_>,
    parent: NodeId,
    node: gltf::Node<'_>,
) -> Result<()> {
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node{}", node.index()));
    let local = Mat4::from_cols_array_2d(&node.transform().matrix());
    let id = scene.add_node(parent, name, local);

    if let Some(mesh) = node.mesh() {
        let mesh_name = mesh.name().unwrap_or("mesh");
        for primitive in mesh.primitives() {
            let Some(mut imported) = read_primitive(&primitive, ctx)? else {
                continue;
            };
            imported.name = mesh_name.to_string();
            imported.material_index = match primitive.material().index() {
                Some(index) => index,
                None => *ctx.default_material.get_or_insert_with(|| {
                    scene.materials.push(Material::default());
                    scene.materials.len() - 1
                }),
            };
            scene.attach_mesh(id, imported);
        }
    }

    for child in node.children() {
        import_node(scene, ctx, id, child)?;
    }
    Ok(())
}

fn read_primitive(primitive: &gltf::Primitive<'_>, ctx: &Context<'_>) -> Result<Option<Mesh>> {
    let mode = primitive.mode();
    match mode {
        Mode::Triangles => {}
        Mode::TriangleStrip | Mode::TriangleFan if ctx.steps.triangulate => {}
        Mode::TriangleStrip | Mode::TriangleFan => {
            bail!("Primitive in {:?} mode needs triangulation", mode)
        }
        other => {
            log::debug!("Skipping non-triangle primitive ({:?})", other);
            return Ok(None);
        }
    }

    let buffers = ctx.buffers;
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| anyhow!("Primitive {} has no POSITION attribute", primitive.index()))?
        .map(Vec3::from)
        .collect();

    let colors: Option<Vec<[f32; 4]>> = reader
        .read_colors(0)
        .map(|c| c.into_rgba_f32().collect());

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    Ok(Some(Mesh {
        name: String::new(),
        faces: assemble_faces(mode, &indices),
        positions,
        colors,
        material_index: 0,
    }))
}

/// Turn an index stream into triangles according to the primitive mode.
fn assemble_faces(mode: Mode, indices: &[u32]) -> Vec<[u32; 3]> {
    match mode {
        Mode::TriangleStrip => (0..indices.len().saturating_sub(2))
            .map(|i| {
                // Odd triangles swap the first two corners to keep winding.
                if i % 2 == 0 {
                    [indices[i], indices[i + 1], indices[i + 2]]
                } else {
                    [indices[i + 1], indices[i], indices[i + 2]]
                }
            })
            .collect(),
        Mode::TriangleFan => (1..indices.len().saturating_sub(1))
            .map(|i| [indices[0], indices[i], indices[i + 1]])
            .collect(),
        _ => indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect(),
    }
}

fn convert_material(material: gltf::Material<'_>) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let diffuse_map = pbr
        .base_color_texture()
        .and_then(|info| match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
            gltf::image::Source::View { .. } => None,
        });

    Material {
        name: material
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("material{}", material.index().unwrap_or_default())),
        diffuse: pbr.base_color_factor(),
        diffuse_map,
    }
}
