//! Post-processing steps requested from an importer.

use corelib::{Mat4, Vec3};

use crate::scene::Scene;

/// Steps applied while (or right after) a file is turned into a [`Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostProcess {
    /// Triangulate polygons, strips and fans. Without it, non-triangle faces
    /// are rejected.
    pub triangulate: bool,
    /// Convert right-handed input to a left-handed coordinate system.
    pub make_left_handed: bool,
}

impl PostProcess {
    /// No processing at all.
    pub const NONE: Self = Self {
        triangulate: false,
        make_left_handed: false,
    };

    /// Realtime-quality preset plus left-handed conversion; what the loader
    /// always asks for.
    pub const TARGET_REALTIME_LEFT_HANDED: Self = Self {
        triangulate: true,
        make_left_handed: true,
    };

    /// Run the steps that operate on a finished scene.
    pub fn apply(&self, scene: &mut Scene) {
        if self.make_left_handed {
            make_left_handed(scene);
        }
    }
}

impl Default for PostProcess {
    fn default() -> Self {
        Self::TARGET_REALTIME_LEFT_HANDED
    }
}

/// Mirror the scene along Z: negate vertex Z, conjugate node transforms by
/// `diag(1, 1, -1, 1)`, and flip triangle winding so front faces stay front.
pub fn make_left_handed(scene: &mut Scene) {
    let mirror = Mat4::from_scale(Vec3::new(1.0, 1.0, -1.0));

    for node in &mut scene.nodes {
        node.transform = mirror * node.transform * mirror;
    }

    for mesh in &mut scene.meshes {
        for p in &mut mesh.positions {
            p.z = -p.z;
        }
        for face in &mut mesh.faces {
            face.swap(1, 2);
        }
    }
}
