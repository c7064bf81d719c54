//! In-memory module images
//!
//! A [`ModuleImage`] is the enumerable form of a module artifact: an ordered
//! list of view types, each with a parameterless constructor. Images are built
//! from bytes by an [`ImageLoader`], never from the artifact path, so the
//! artifact stays free for an external build to replace.

use hotswap_view_api::{
    API_VERSION_SYMBOL, VIEW_API_VERSION, VIEW_TYPES_SYMBOL, View, ViewError,
    ViewTypeDescriptor, ViewTypeInfo, qualify,
};
use libloading::Library;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Shared parameterless constructor for one view type
pub type SharedConstructor = Arc<dyn Fn() -> Result<Box<dyn View>, ViewError> + Send + Sync>;

/// Errors raised while turning module bytes into an image
#[derive(Error, Debug)]
pub enum ImageError {
    /// The shadow copy could not be written
    #[error("failed to stage shadow copy of {origin}: {source}")]
    Shadow {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// The platform loader rejected the bytes
    #[error("failed to load library {origin}: {source}")]
    Library {
        origin: String,
        #[source]
        source: libloading::Error,
    },

    /// A required export is missing
    #[error("{origin} does not export {symbol}")]
    MissingExport { origin: String, symbol: &'static str },

    /// API version mismatch between host and module
    #[error("view API version mismatch in {origin}: host expects {expected}, module has {found}")]
    ApiVersionMismatch {
        origin: String,
        expected: u32,
        found: u32,
    },

    /// The module returned no type table
    #[error("{origin} returned a null view type table")]
    NullTypeTable { origin: String },

    /// The bytes are not in the format this loader understands
    #[error("{origin} is malformed: {detail}")]
    Malformed { origin: String, detail: String },
}

/// One loadable type inside a [`ModuleImage`]
#[derive(Clone)]
pub struct TypeEntry {
    namespace: String,
    name: String,
    constructor: SharedConstructor,
}

impl TypeEntry {
    pub fn new<F>(namespace: impl Into<String>, name: impl Into<String>, constructor: F) -> Self
    where
        F: Fn() -> Result<Box<dyn View>, ViewError> + Send + Sync + 'static,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            constructor: Arc::new(constructor),
        }
    }

    /// Wrap a descriptor exported by a native module
    pub fn from_descriptor(descriptor: &ViewTypeDescriptor) -> Self {
        let create = descriptor.create;
        Self::new(descriptor.namespace, descriptor.name, move || create())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    /// A handle to the constructor that can be moved to another thread
    pub fn constructor(&self) -> SharedConstructor {
        Arc::clone(&self.constructor)
    }

    pub fn info(&self) -> ViewTypeInfo {
        ViewTypeInfo {
            namespace: self.namespace.clone(),
            name: self.name.clone(),
            full_name: self.full_name(),
        }
    }
}

impl fmt::Debug for TypeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntry")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .finish()
    }
}

/// An in-memory module, enumerable by type.
///
/// There is no unload. A native image keeps its library mapped for the rest
/// of the process, because views built from it point into its code.
pub struct ModuleImage {
    origin: String,
    types: Vec<TypeEntry>,
    library: Option<&'static Library>,
}

impl ModuleImage {
    /// Build an image from already-known types, in enumeration order
    pub fn new(origin: impl Into<String>, types: Vec<TypeEntry>) -> Self {
        Self {
            origin: origin.into(),
            types,
            library: None,
        }
    }

    /// Label of the artifact the bytes came from (for diagnostics only)
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Types in enumeration order
    pub fn types(&self) -> &[TypeEntry] {
        &self.types
    }

    /// Whether the image is backed by a loaded native library
    pub fn is_native(&self) -> bool {
        self.library.is_some()
    }
}

impl fmt::Debug for ModuleImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleImage")
            .field("origin", &self.origin)
            .field("types", &self.types.len())
            .field("native", &self.is_native())
            .finish()
    }
}

/// Turns module bytes into a [`ModuleImage`]
pub trait ImageLoader: Send + Sync {
    fn materialize(&self, bytes: &[u8], origin: &str) -> Result<ModuleImage, ImageError>;
}

type ApiVersionFn = unsafe extern "C" fn() -> u32;
#[allow(improper_ctypes_definitions)]
type ViewTypesFn = unsafe extern "C" fn() -> *const [ViewTypeDescriptor];

/// Loads native view modules built against `hotswap-view-api`.
///
/// The bytes are written to a uniquely named shadow file, opened with the
/// platform loader, and the shadow file is removed again. A fresh name per
/// load keeps the platform loader from handing back an earlier image of the
/// same artifact.
#[derive(Debug, Clone)]
pub struct NativeImageLoader {
    shadow_dir: PathBuf,
}

impl NativeImageLoader {
    pub fn new(shadow_dir: impl Into<PathBuf>) -> Self {
        Self {
            shadow_dir: shadow_dir.into(),
        }
    }

    pub fn shadow_dir(&self) -> &Path {
        &self.shadow_dir
    }

    fn stage(&self, bytes: &[u8], origin: &str) -> Result<tempfile::TempPath, ImageError> {
        let shadow_err = |source| ImageError::Shadow {
            origin: origin.to_string(),
            source,
        };

        std::fs::create_dir_all(&self.shadow_dir).map_err(shadow_err)?;

        let stem = Path::new(origin)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("module");
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", stem))
            .suffix(&format!(".{}", std::env::consts::DLL_EXTENSION))
            .tempfile_in(&self.shadow_dir)
            .map_err(shadow_err)?;
        file.write_all(bytes).map_err(shadow_err)?;
        file.flush().map_err(shadow_err)?;

        // Close our handle; the path is removed when the TempPath drops
        Ok(file.into_temp_path())
    }
}

impl Default for NativeImageLoader {
    fn default() -> Self {
        Self::new(hotswap_paths::shadow_dir())
    }
}

impl ImageLoader for NativeImageLoader {
    fn materialize(&self, bytes: &[u8], origin: &str) -> Result<ModuleImage, ImageError> {
        let shadow = self.stage(bytes, origin)?;
        debug!(origin, shadow = %shadow.display(), "Staged shadow copy");

        // SAFETY: loading a module the user configured as a view module.
        // Its initialisers run here.
        let library = unsafe { Library::new(&*shadow) }.map_err(|source| ImageError::Library {
            origin: origin.to_string(),
            source,
        })?;

        // SAFETY: the symbol type matches what `export_views!` generates.
        let version_fn: ApiVersionFn = *unsafe { library.get::<ApiVersionFn>(API_VERSION_SYMBOL) }
            .map_err(|_| ImageError::MissingExport {
                origin: origin.to_string(),
                symbol: "_hotswap_view_api_version",
            })?;
        let found = unsafe { version_fn() };
        if found != VIEW_API_VERSION {
            return Err(ImageError::ApiVersionMismatch {
                origin: origin.to_string(),
                expected: VIEW_API_VERSION,
                found,
            });
        }

        // SAFETY: as above.
        let types_fn: ViewTypesFn = *unsafe { library.get::<ViewTypesFn>(VIEW_TYPES_SYMBOL) }
            .map_err(|_| ImageError::MissingExport {
                origin: origin.to_string(),
                symbol: "_hotswap_view_types",
            })?;

        // Never unloaded: views created from this image run its code.
        let library: &'static Library = Box::leak(Box::new(library));

        let table = unsafe { types_fn() };
        if table.is_null() {
            return Err(ImageError::NullTypeTable {
                origin: origin.to_string(),
            });
        }
        // SAFETY: the table is a static inside the leaked library.
        let descriptors: &'static [ViewTypeDescriptor] = unsafe { &*table };
        let types = descriptors.iter().map(TypeEntry::from_descriptor).collect::<Vec<_>>();

        if let Err(e) = shadow.close() {
            debug!(origin, error = %e, "Could not remove shadow copy");
        }

        info!(origin, types = types.len(), "Materialized module image");

        Ok(ModuleImage {
            origin: origin.to_string(),
            types,
            library: Some(library),
        })
    }
}
