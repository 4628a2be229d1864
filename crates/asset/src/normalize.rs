//! World-space bounds of a scene and the correction that fits it into the
//! viewing volume.

use corelib::{Aabb, FitTransform, Mat4};

use crate::scene::{NodeId, ROOT, Scene};

/// Widen `bounds` by every vertex below `node`, in world space.
///
/// `parent` is the accumulated transform of the node's ancestors. Column
/// vectors: a node's world matrix is `parent * local`, so the local
/// transform is applied to a vertex first. The whole subtree is visited
/// regardless of the loader's traversal policy.
pub fn calculate_bounds(scene: &Scene, node: NodeId, parent: Mat4, bounds: &mut Aabb) {
    let node = scene.node(node);
    let world = parent * node.transform;

    for &mesh in &node.meshes {
        for &p in &scene.meshes[mesh].positions {
            bounds.grow(world.project_point3(p));
        }
    }

    for &child in &node.children {
        calculate_bounds(scene, child, world, bounds);
    }
}

/// Bounds of the whole scene starting from the root with identity.
pub fn scene_bounds(scene: &Scene) -> Aabb {
    let mut bounds = Aabb::EMPTY;
    calculate_bounds(scene, ROOT, Mat4::IDENTITY, &mut bounds);
    bounds
}

/// Compute the correction that centers the asset on the origin and scales
/// its bounds diagonal to `target_extent`, times `user_scale`. Vertex data
/// is left untouched.
pub fn scale_asset(scene: &Scene, target_extent: f32, user_scale: f32) -> (Aabb, FitTransform) {
    let bounds = scene_bounds(scene);
    let fit = FitTransform::fit(&bounds, target_extent, user_scale);
    log::debug!(
        "Bounds min={:?} max={:?}, center={:?}, scale={}",
        bounds.min,
        bounds.max,
        fit.center,
        fit.scale()
    );
    (bounds, fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Material, Mesh};
    use corelib::{TARGET_EXTENT, Vec3, vec3};

    fn triangle() -> Mesh {
        Mesh {
            name: "tri".into(),
            positions: vec![vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)],
            colors: None,
            faces: vec![[0, 1, 2]],
            material_index: 0,
        }
    }

    fn single_triangle_scene() -> Scene {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        scene.attach_mesh(ROOT, triangle());
        scene
    }

    #[test]
    fn triangle_bounds_with_identity() {
        let b = scene_bounds(&single_triangle_scene());
        assert_eq!(b.min, vec3(0.0, 0.0, 0.0));
        assert_eq!(b.max, vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn child_transform_applies_before_parent() {
        // parent scales by 2, child translates by (1, 0, 0): the vertex at the
        // origin lands at (2, 0, 0), not (1, 0, 0).
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let parent = scene.add_node(ROOT, "parent", Mat4::from_scale(Vec3::splat(2.0)));
        let child = scene.add_node(parent, "child", Mat4::from_translation(vec3(1.0, 0.0, 0.0)));
        scene.attach_mesh(
            child,
            Mesh {
                positions: vec![Vec3::ZERO],
                ..Mesh::default()
            },
        );

        let b = scene_bounds(&scene);
        assert_eq!(b.min, vec3(2.0, 0.0, 0.0));
        assert_eq!(b.max, vec3(2.0, 0.0, 0.0));
    }

    #[test]
    fn bounds_walk_reaches_grandchildren() {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let a = scene.add_node(ROOT, "a", Mat4::IDENTITY);
        let aa = scene.add_node(a, "aa", Mat4::from_translation(vec3(0.0, 0.0, -5.0)));
        scene.attach_mesh(aa, triangle());

        let b = scene_bounds(&scene);
        assert_eq!(b.min, vec3(0.0, 0.0, -5.0));
        assert_eq!(b.max, vec3(1.0, 1.0, -5.0));
    }

    #[test]
    fn scale_asset_fits_and_centers() {
        let scene = single_triangle_scene();
        let (bounds, fit) = scale_asset(&scene, TARGET_EXTENT, 1.0);
        let length = bounds.extent().length();
        assert!((fit.fit_scale - TARGET_EXTENT / length).abs() < 1e-5);

        let center = fit.matrix().transform_point3(bounds.center());
        assert!(center.length() < 1e-5);
    }

    #[test]
    fn scale_asset_on_empty_scene_is_finite() {
        let mut scene = Scene::new();
        scene.materials.push(Material::default());
        let (bounds, fit) = scale_asset(&scene, TARGET_EXTENT, 3.0);
        assert!(bounds.is_empty());
        assert_eq!(fit.scale(), 3.0);
        assert!(fit.matrix().to_cols_array().iter().all(|f| f.is_finite()));
    }
}
