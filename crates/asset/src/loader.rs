//! Model loader: imports a file and flattens its scene graph into vertex,
//! index, subset and material buffers plus a world correction transform.

use std::{fs::File, path::Path};

use corelib::{Aabb, FitTransform, Mat4, TARGET_EXTENT};

use crate::{
    error::{LoadError, LoadResult},
    import::{FileImporter, Importer},
    mesh::{Subset, Vertex},
    normalize,
    postprocess::PostProcess,
    scene::{Material, Scene},
    traverse::{Traversal, mesh_order},
};

/// Color of vertices from meshes without a color channel. The zero alpha
/// makes it fully transparent under alpha blending.
pub const DEFAULT_VERTEX_COLOR: [f32; 4] = [1.0, 1.0, 0.0, 0.0];

/// Highest vertex count a `u16` index buffer can address.
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

/// Knobs for a single load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoadOptions {
    /// Uniform factor applied on top of the fit-to-volume scale.
    pub scale: f32,
    pub traversal: Traversal,
    pub post_process: PostProcess,
    /// Edge length of the viewing cube the bounds diagonal is fitted to.
    pub target_extent: f32,
}

impl LoadOptions {
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_post_process(mut self, post_process: PostProcess) -> Self {
        self.post_process = post_process;
        self
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            traversal: Traversal::Shallow,
            post_process: PostProcess::TARGET_REALTIME_LEFT_HANDED,
            target_extent: TARGET_EXTENT,
        }
    }
}

/// Everything a load produces. Subsets partition `vertices` and `indices`
/// in traversal order.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedModel {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
    pub subsets: Vec<Subset>,
    pub materials: Vec<Material>,
    /// World-space bounds of the source scene.
    pub bounds: Aabb,
    pub correction: FitTransform,
}

impl LoadedModel {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// World matrix to apply at render time.
    #[inline]
    pub fn world(&self) -> Mat4 {
        self.correction.matrix()
    }

    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Loads models through an [`Importer`].
#[derive(Clone, Debug, Default)]
pub struct ModelLoader<I = FileImporter> {
    importer: I,
}

impl ModelLoader<FileImporter> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: Importer> ModelLoader<I> {
    pub fn with_importer(importer: I) -> Self {
        Self { importer }
    }

    /// Check the file, import it and build the flat buffers.
    pub fn load(&self, path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<LoadedModel> {
        let path = path.as_ref();
        log::info!("Loading model {:?} (scale={})", path, options.scale);

        File::open(path).map_err(|e| LoadError::NotFound(path.to_path_buf(), e))?;

        let scene = self
            .importer
            .read_file(path, options.post_process)
            .and_then(|scene| scene.validate().map(|()| scene))
            .map_err(|e| LoadError::ImportFailed(path.to_path_buf(), e))?;

        if !scene.has_meshes() {
            return Err(LoadError::EmptyScene(path.to_path_buf()));
        }

        let model = build_model(path, &scene, options)?;
        log::info!(
            "Loaded {:?}: {} vertices, {} triangles, {} subsets, {} materials",
            path,
            model.num_vertices(),
            model.num_triangles(),
            model.subsets.len(),
            model.materials.len()
        );
        Ok(model)
    }
}

/// Load `path` with the default file importer.
pub fn load_model(path: impl AsRef<Path>, options: &LoadOptions) -> LoadResult<LoadedModel> {
    ModelLoader::new().load(path, options)
}

/// Run the passes in order: materials, subsets, vertices, triangles, scaling.
/// Each pass walks the hierarchy on its own.
pub fn build_model(path: &Path, scene: &Scene, options: &LoadOptions) -> LoadResult<LoadedModel> {
    let (vertex_total, _) = count_elements(scene, options.traversal);
    if vertex_total > MAX_VERTICES {
        return Err(LoadError::TooManyVertices(path.to_path_buf(), vertex_total));
    }

    let materials = init_materials(scene);
    let subsets = init_subsets(scene, options.traversal);
    let vertices = init_vertices(scene, options.traversal);
    let indices = init_triangles(scene, options.traversal);
    let (bounds, correction) = normalize::scale_asset(scene, options.target_extent, options.scale);

    if subsets.len() < scene.meshes.len() {
        log::warn!(
            "{} of {} meshes are not reachable with {:?} traversal",
            scene.meshes.len() - subsets.len(),
            scene.meshes.len(),
            options.traversal
        );
    }

    Ok(LoadedModel {
        vertices,
        indices,
        subsets,
        materials,
        bounds,
        correction,
    })
}

/// Total (vertices, faces) over the visited meshes.
pub fn count_elements(scene: &Scene, traversal: Traversal) -> (usize, usize) {
    mesh_order(scene, traversal)
        .into_iter()
        .map(|m| &scene.meshes[m])
        .fold((0, 0), |(v, f), mesh| (v + mesh.num_vertices(), f + mesh.num_faces()))
}

fn init_materials(scene: &Scene) -> Vec<Material> {
    scene.materials.clone()
}

fn init_subsets(scene: &Scene, traversal: Traversal) -> Vec<Subset> {
    let mut subsets = Vec::new();
    let mut vertex_counter = 0u32;
    let mut face_counter = 0u32;

    for m in mesh_order(scene, traversal) {
        let mesh = &scene.meshes[m];
        let subset = Subset {
            id: mesh.material_index as u32,
            vertex_start: vertex_counter,
            vertex_count: mesh.num_vertices() as u32,
            face_start: face_counter,
            face_count: mesh.num_faces() as u32,
        };
        vertex_counter += subset.vertex_count;
        face_counter += subset.face_count;
        subsets.push(subset);
    }

    log::debug!("Subset pass: {} subsets", subsets.len());
    subsets
}

fn init_vertices(scene: &Scene, traversal: Traversal) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for m in mesh_order(scene, traversal) {
        let mesh = &scene.meshes[m];
        for (b, p) in mesh.positions.iter().enumerate() {
            let color = match &mesh.colors {
                Some(colors) => colors[b],
                None => DEFAULT_VERTEX_COLOR,
            };
            vertices.push(Vertex::new(p.to_array(), color));
        }
    }

    log::debug!("Vertex pass: {} vertices", vertices.len());
    vertices
}

/// Indices are offset by the vertices contributed by earlier meshes. The
/// caller guarantees the total fits in `u16`.
fn init_triangles(scene: &Scene, traversal: Traversal) -> Vec<u16> {
    let mut indices = Vec::new();
    let mut index_start = 0u32;

    for m in mesh_order(scene, traversal) {
        let mesh = &scene.meshes[m];
        for face in &mesh.faces {
            indices.extend(face.iter().map(|&i| (i + index_start) as u16));
        }
        index_start += mesh.num_vertices() as u32;
    }

    log::debug!("Triangle pass: {} indices", indices.len());
    indices
}
