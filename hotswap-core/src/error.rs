//! Hot reload error types

use hotswap_view_api::qualify;
use std::path::PathBuf;
use thiserror::Error;

use crate::display::DispatchError;
use crate::image::ImageError;
use crate::loader::LoadError;
use crate::resolver::ResolveError;

/// Everything a reload can fail with.
///
/// The message is meant for the user: it names the file, namespace, and type
/// involved.
#[derive(Error, Debug)]
pub enum HotReloadError {
    /// The module artifact does not exist at the resolved path
    #[error("hot reload error: module not found at {}", .path.display())]
    ArtifactNotFound { path: PathBuf },

    /// The module artifact exists but could not be read
    #[error("hot reload error: failed to read {}: {source}", .path.display())]
    ArtifactRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a loadable view module
    #[error("hot reload error: {module} is not a loadable view module: {source}")]
    ImageLoad {
        module: String,
        #[source]
        source: ImageError,
    },

    /// No type in the module matched the target
    #[error("hot reload error: type {} not found in {module}", qualify(.namespace, .type_name))]
    TypeNotFound {
        namespace: String,
        type_name: String,
        module: String,
    },

    /// The type's constructor failed or panicked
    #[error("hot reload error: construction error: {type_name}: {detail}")]
    Construction { type_name: String, detail: String },

    /// The display could not take the new view
    #[error("hot reload error: publication failed: {0}")]
    Publication(#[from] DispatchError),
}

impl From<LoadError> for HotReloadError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::NotFound { path } => Self::ArtifactNotFound { path },
            LoadError::Read { path, source } => Self::ArtifactRead { path, source },
        }
    }
}

impl HotReloadError {
    /// Attach the module name to a resolver failure
    pub fn from_resolve(err: ResolveError, module: &str) -> Self {
        match err {
            ResolveError::Image(source) => Self::ImageLoad {
                module: module.to_string(),
                source,
            },
            ResolveError::TypeNotFound {
                namespace,
                type_name,
                ..
            } => Self::TypeNotFound {
                namespace,
                type_name,
                module: module.to_string(),
            },
        }
    }

    /// Short machine-friendly name of the failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ArtifactNotFound { .. } => "artifact_not_found",
            Self::ArtifactRead { .. } => "artifact_read",
            Self::ImageLoad { .. } => "image_load",
            Self::TypeNotFound { .. } => "type_not_found",
            Self::Construction { .. } => "construction",
            Self::Publication(_) => "publication",
        }
    }
}
