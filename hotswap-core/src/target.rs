//! What to reload

use hotswap_view_api::qualify;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a view type inside a module artifact.
///
/// Resolved from configuration and handed to the core as-is; the core only
/// reads it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReloadTarget {
    /// File name of the module artifact, relative to the base directory
    module: String,
    /// Dotted namespace of the view type
    #[serde(default)]
    namespace: String,
    /// Simple name of the view type
    type_name: String,
}

impl ReloadTarget {
    pub fn new(
        module: impl Into<String>,
        namespace: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            namespace: namespace.into(),
            type_name: type_name.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// `<namespace>.<type_name>`, or just the type name without a namespace
    pub fn qualified_name(&self) -> String {
        qualify(&self.namespace, &self.type_name)
    }
}

impl fmt::Display for ReloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.qualified_name(), self.module)
    }
}
