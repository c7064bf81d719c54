//! Type resolver - finds the target view type inside a module image

use hotswap_view_api::qualify;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::image::{ImageError, ImageLoader, ModuleImage, NativeImageLoader, TypeEntry};

/// Rule for deciding whether a type in an image is the requested one.
///
/// Whatever the rule, candidates are tried in the image's enumeration order
/// and the first match wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Fully-qualified name must equal `<namespace>.<type_name>`. With an
    /// empty namespace the simple name must equal the type name.
    #[default]
    Exact,
    /// Fully-qualified name ends with the type name, or the simple name
    /// equals it. The namespace is ignored. `HelloView` also matches
    /// `Demo.MyHelloView` under this rule.
    Suffix,
}

impl MatchPolicy {
    pub fn matches(&self, entry: &TypeEntry, namespace: &str, type_name: &str) -> bool {
        match self {
            MatchPolicy::Exact if namespace.is_empty() => entry.name() == type_name,
            MatchPolicy::Exact => entry.namespace() == namespace && entry.name() == type_name,
            MatchPolicy::Suffix => {
                entry.full_name().ends_with(type_name) || entry.name() == type_name
            }
        }
    }
}

/// Errors from resolving a type
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The bytes could not be turned into an image
    #[error(transparent)]
    Image(#[from] ImageError),

    /// No type in the image matched
    #[error("type {} not found in {origin}", qualify(.namespace, .type_name))]
    TypeNotFound {
        namespace: String,
        type_name: String,
        origin: String,
    },
}

/// Handle to one type inside a module image.
///
/// Shares ownership of the image it came from.
#[derive(Debug, Clone)]
pub struct ResolvedType {
    image: Arc<ModuleImage>,
    index: usize,
}

impl ResolvedType {
    pub fn entry(&self) -> &TypeEntry {
        &self.image.types()[self.index]
    }

    pub fn image(&self) -> &ModuleImage {
        &self.image
    }

    pub fn full_name(&self) -> String {
        self.entry().full_name()
    }
}

/// Materializes module images and picks types out of them.
#[derive(Clone)]
pub struct TypeResolver {
    loader: Arc<dyn ImageLoader>,
    policy: MatchPolicy,
}

impl TypeResolver {
    pub fn new(loader: Arc<dyn ImageLoader>, policy: MatchPolicy) -> Self {
        Self { loader, policy }
    }

    /// Resolver backed by [`NativeImageLoader`] with the default shadow directory
    pub fn native(policy: MatchPolicy) -> Self {
        Self::new(Arc::new(NativeImageLoader::default()), policy)
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Turn bytes into an image without selecting a type
    pub fn materialize(&self, bytes: &[u8], origin: &str) -> Result<ModuleImage, ImageError> {
        self.loader.materialize(bytes, origin)
    }

    /// Materialize `bytes` and find the requested type in the result.
    ///
    /// `origin` only labels diagnostics; the image is never tied to a path.
    pub fn resolve(
        &self,
        bytes: &[u8],
        origin: &str,
        namespace: &str,
        type_name: &str,
    ) -> Result<ResolvedType, ResolveError> {
        let image = Arc::new(self.materialize(bytes, origin)?);
        self.find(image, namespace, type_name)
    }

    /// Find the requested type in an already materialized image
    pub fn find(
        &self,
        image: Arc<ModuleImage>,
        namespace: &str,
        type_name: &str,
    ) -> Result<ResolvedType, ResolveError> {
        let (index, ignored) = {
            let mut candidates = image
                .types()
                .iter()
                .enumerate()
                .filter(|(_, entry)| self.policy.matches(entry, namespace, type_name));

            let Some((index, _)) = candidates.next() else {
                return Err(ResolveError::TypeNotFound {
                    namespace: namespace.to_string(),
                    type_name: type_name.to_string(),
                    origin: image.origin().to_string(),
                });
            };
            let ignored: Vec<String> = candidates.map(|(_, entry)| entry.full_name()).collect();
            (index, ignored)
        };

        let resolved = ResolvedType { image, index };

        if !ignored.is_empty() {
            warn!(
                target_type = %qualify(namespace, type_name),
                chosen = %resolved.full_name(),
                ignored = ?ignored,
                "Several types match, using the first"
            );
        }
        debug!(
            origin = %resolved.image().origin(),
            resolved = %resolved.full_name(),
            policy = ?self.policy,
            "Resolved view type"
        );

        Ok(resolved)
    }
}
