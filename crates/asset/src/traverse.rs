//! Order in which the loader visits meshes of a scene.

use std::str::FromStr;

use crate::scene::{ROOT, Scene};

/// How deep the loader looks for meshes below the root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Traversal {
    /// Only the root's immediate children and their meshes. Meshes on the
    /// root itself or on grandchildren are not visited.
    #[default]
    Shallow,
    /// Pre-order walk of the whole tree: a node's meshes, then its children.
    Recursive,
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shallow" => Ok(Self::Shallow),
            "recursive" | "full" => Ok(Self::Recursive),
            other => Err(format!("unknown traversal '{other}'")),
        }
    }
}

/// Mesh indices in visiting order. A root without children means the scene's
/// mesh list is taken as-is, in order.
pub fn mesh_order(scene: &Scene, traversal: Traversal) -> Vec<usize> {
    let root = scene.root();
    if root.children.is_empty() {
        return (0..scene.meshes.len()).collect();
    }

    match traversal {
        Traversal::Shallow => root
            .children
            .iter()
            .flat_map(|&child| scene.node(child).meshes.iter().copied())
            .collect(),
        Traversal::Recursive => {
            let mut order = Vec::new();
            let mut stack = vec![ROOT];
            while let Some(id) = stack.pop() {
                let node = scene.node(id);
                order.extend_from_slice(&node.meshes);
                // Reverse so the first child is visited first.
                stack.extend(node.children.iter().rev().copied());
            }
            order
        }
    }
}
