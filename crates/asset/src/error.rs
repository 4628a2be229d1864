use std::path::PathBuf;

/// Errors that can occur while loading a model.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("couldn't open file '{0}': {1}")]
    NotFound(PathBuf, #[source] std::io::Error),

    #[error("failed to import '{0}': {1:#}")]
    ImportFailed(PathBuf, #[source] anyhow::Error),

    #[error("model '{0}' contains no meshes")]
    EmptyScene(PathBuf),

    #[error("model '{0}' has {1} vertices, more than 16-bit indices can address")]
    TooManyVertices(PathBuf, usize),
}

pub type LoadResult<T> = Result<T, LoadError>;
