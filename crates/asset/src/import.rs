//! Importer service: turns a model file into a [`Scene`].

use std::{ffi::OsStr, path::Path};

use anyhow::{Result, bail};

use crate::{gltf_loader, obj_loader, postprocess::PostProcess, scene::Scene};

/// Parses a file into a scene graph with the requested post-processing.
pub trait Importer {
    fn read_file(&self, path: &Path, steps: PostProcess) -> Result<Scene>;
}

/// Picks a backend from the file extension: `tobj` for `.obj`, `gltf` for
/// `.gltf` / `.glb`. Handedness conversion runs on the finished scene.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileImporter;

impl Importer for FileImporter {
    fn read_file(&self, path: &Path, steps: PostProcess) -> Result<Scene> {
        let ext = path
            .extension()
            .and_then(OsStr::to_str)
            .map(str::to_ascii_lowercase);

        let mut scene = match ext.as_deref() {
            Some("obj") => obj_loader::load_obj(path, steps)?,
            Some("gltf" | "glb") => gltf_loader::load_gltf(path, steps)?,
            Some(other) => bail!("Unsupported model format '.{}'", other),
            None => bail!("Cannot tell the model format of {}", path.display()),
        };

        steps.apply(&mut scene);
        Ok(scene)
    }
}
