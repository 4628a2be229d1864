//! OBJ importer on top of `tobj`: each model becomes one mesh, materials come
//! from the referenced MTL libraries.

use std::path::Path;

use anyhow::{Context, Result, bail};
use corelib::{Mat4, Vec3};

use crate::{
    postprocess::PostProcess,
    scene::{Material, Mesh, ROOT, Scene},
};

/// Load an OBJ file and its `mtllib` materials. A missing or broken material
/// library is logged and the affected meshes fall back to a default material.
pub fn load_obj(path: &Path, steps: PostProcess) -> Result<Scene> {
    let load_options = tobj::LoadOptions {
        triangulate: steps.triangulate,
        single_index: false,
        ..Default::default()
    };

    let (models, materials) = tobj::load_obj(path, &load_options)
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;

    let materials = materials.unwrap_or_else(|err| {
        log::warn!("Skipping materials of {}: {}", path.display(), err);
        Vec::new()
    });

    let scene = build_scene(models, materials)?;
    log::debug!(
        "OBJ '{}': {} meshes, {} materials",
        path.display(),
        scene.meshes.len(),
        scene.materials.len()
    );
    Ok(scene)
}

fn build_scene(models: Vec<tobj::Model>, materials: Vec<tobj::Material>) -> Result<Scene> {
    let mut scene = Scene::new();
    scene.materials = materials.iter().map(convert_material).collect();
    let library_len = scene.materials.len();

    let models: Vec<tobj::Model> = models
        .into_iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .collect();
    // A lone model stays on the root, several become children of it.
    let flat = models.len() == 1;

    let mut default_material = None;
    for model in models {
        let tobj::Model { mesh, name } = model;
        let material_index = match mesh.material_id {
            Some(id) if id < library_len => id,
            _ => *default_material.get_or_insert_with(|| {
                scene.materials.push(Material::default());
                scene.materials.len() - 1
            }),
        };

        let converted = convert_mesh(&name, mesh, material_index)?;
        let node = if flat {
            ROOT
        } else {
            scene.add_node(ROOT, name, Mat4::IDENTITY)
        };
        scene.attach_mesh(node, converted);
    }
    Ok(scene)
}

fn convert_mesh(name: &str, mesh: tobj::Mesh, material_index: usize) -> Result<Mesh> {
    if mesh.face_arities.iter().any(|&arity| arity != 3) {
        bail!("Model '{}' has polygons that need triangulation", name);
    }

    let positions: Vec<Vec3> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();

    let colors = (!mesh.vertex_color.is_empty()).then(|| {
        mesh.vertex_color
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], 1.0])
            .collect::<Vec<_>>()
    });

    let faces = mesh
        .indices
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect();

    Ok(Mesh {
        name: name.to_string(),
        positions,
        colors,
        faces,
        material_index,
    })
}

fn convert_material(material: &tobj::Material) -> Material {
    let mut converted = Material::named(material.name.as_str());
    if let Some(rgb) = material.diffuse {
        converted.diffuse[..3].copy_from_slice(&rgb);
    }
    if let Some(alpha) = material.dissolve {
        converted.diffuse[3] = alpha;
    }
    converted.diffuse_map = material.diffuse_texture.clone();
    converted
}
