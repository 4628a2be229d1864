//! Imported scene graph: an arena of nodes over a flat mesh list.

use anyhow::{Result, bail};
use corelib::{Mat4, Vec3};

/// Index of a node inside [`Scene::nodes`].
pub type NodeId = usize;

/// The root is always the first node of the arena.
pub const ROOT: NodeId = 0;

/// Scene graph node with a local transform (column-major, column vectors).
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Mat4,
    pub children: Vec<NodeId>,
    /// Indices into [`Scene::meshes`].
    pub meshes: Vec<usize>,
}

impl Node {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
            meshes: Vec::new(),
        }
    }
}

/// Triangulated mesh. Faces index into `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    /// First vertex-color channel (RGBA), one entry per position.
    pub colors: Option<Vec<[f32; 4]>>,
    pub faces: Vec<[u32; 3]>,
    pub material_index: usize,
}

impl Mesh {
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }
}

/// Surface description carried through to the caller; textures are only
/// referenced, never decoded.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub diffuse: [f32; 4],
    pub diffuse_map: Option<String>,
}

impl Material {
    pub const DEFAULT_NAME: &'static str = "DefaultMaterial";

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            diffuse: [0.6, 0.6, 0.6, 1.0],
            diffuse_map: None,
        }
    }
}

/// Scene returned by an importer. Always has a root node.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new("root", Mat4::IDENTITY)],
            meshes: Vec::new(),
            materials: Vec::new(),
        }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn has_meshes(&self) -> bool {
        !self.meshes.is_empty()
    }

    /// Append a child under `parent` and return its id.
    pub fn add_node(&mut self, parent: NodeId, name: impl Into<String>, transform: Mat4) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(name, transform));
        self.nodes[parent].children.push(id);
        id
    }

    /// Push a mesh into the flat list and reference it from `node`.
    pub fn attach_mesh(&mut self, node: NodeId, mesh: Mesh) -> usize {
        let index = self.meshes.len();
        self.meshes.push(mesh);
        self.nodes[node].meshes.push(index);
        index
    }

    /// Check every cross reference so later passes can index without
    /// bounds failures.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            bail!("Scene has no root node");
        }

        let mut parents = vec![0usize; self.nodes.len()];
        for (id, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if child >= self.nodes.len() || child == ROOT {
                    bail!("Node {} ('{}') has invalid child {}", id, node.name, child);
                }
                parents[child] += 1;
            }
            for &mesh in &node.meshes {
                if mesh >= self.meshes.len() {
                    bail!("Node {} ('{}') references missing mesh {}", id, node.name, mesh);
                }
            }
        }
        if let Some(id) = parents.iter().position(|&count| count > 1) {
            bail!("Node {} has more than one parent", id);
        }

        for (i, mesh) in self.meshes.iter().enumerate() {
            let count = mesh.num_vertices();
            if let Some(face) = mesh
                .faces
                .iter()
                .find(|face| face.iter().any(|&idx| idx as usize >= count))
            {
                bail!(
                    "Mesh {} ('{}') has face {:?} out of range (vertices={})",
                    i,
                    mesh.name,
                    face,
                    count
                );
            }
            if let Some(colors) = &mesh.colors {
                if colors.len() != count {
                    bail!(
                        "Mesh {} ('{}') has {} colors for {} vertices",
                        i,
                        mesh.name,
                        colors.len(),
                        count
                    );
                }
            }
            if mesh.material_index >= self.materials.len() {
                bail!(
                    "Mesh {} ('{}') references missing material {}",
                    i,
                    mesh.name,
                    mesh.material_index
                );
            }
        }

        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::vec3;

    fn triangle(material_index: usize) -> Mesh {
        Mesh {
            name: "tri".into(),
            positions: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)],
            colors: None,
            faces: vec![[0, 1, 2]],
            material_index,
        }
    }

    #[test]
    fn builder_links_nodes_and_meshes() {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let child = scene.add_node(ROOT, "child", Mat4::IDENTITY);
        let mesh = scene.attach_mesh(child, triangle(0));

        assert_eq!(scene.root().children, vec![child]);
        assert_eq!(scene.node(child).meshes, vec![mesh]);
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_face() {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let mut mesh = triangle(0);
        mesh.faces.push([0, 1, 3]);
        scene.attach_mesh(ROOT, mesh);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_color_length_mismatch() {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let mut mesh = triangle(0);
        mesh.colors = Some(vec![[1.0; 4]]);
        scene.attach_mesh(ROOT, mesh);
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_missing_material() {
        let mut scene = Scene::new();
        scene.attach_mesh(ROOT, triangle(2));
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_shared_child() {
        let mut scene = Scene::new();
        let a = scene.add_node(ROOT, "a", Mat4::IDENTITY);
        let b = scene.add_node(ROOT, "b", Mat4::IDENTITY);
        scene.nodes[b].children.push(a);
        assert!(scene.validate().is_err());
    }
}
