//! Model loading: importers (OBJ, glTF) producing a scene graph, and the
//! loader that flattens it into render buffers with a fit-to-view transform.

mod error;
mod gltf_loader;
mod import;
mod loader;
pub mod mesh;
pub mod normalize;
mod obj_loader;
mod postprocess;
pub mod scene;
mod traverse;

pub use error::{LoadError, LoadResult};
pub use gltf_loader::load_gltf;
pub use import::{FileImporter, Importer};
pub use loader::{
    DEFAULT_VERTEX_COLOR, LoadOptions, LoadedModel, MAX_VERTICES, ModelLoader, build_model,
    count_elements, load_model,
};
pub use mesh::{Subset, Vertex};
pub use obj_loader::load_obj;
pub use postprocess::{PostProcess, make_left_handed};
pub use scene::{Material, Mesh, Node, NodeId, Scene};
pub use traverse::{Traversal, mesh_order};
