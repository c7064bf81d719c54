//! View type descriptors exported by modules

use serde::{Deserialize, Serialize};

use crate::{View, ViewError};

/// Parameterless constructor for a view type.
pub type ViewConstructor = fn() -> Result<Box<dyn View>, ViewError>;

/// One loadable view type inside a module.
///
/// Modules export a static table of these through [`export_views!`](crate::export_views).
/// The table order is the module's enumeration order.
#[derive(Debug, Clone, Copy)]
pub struct ViewTypeDescriptor {
    /// Dotted namespace, e.g. `Demo.Views`
    pub namespace: &'static str,
    /// Simple type name, e.g. `HelloView`
    pub name: &'static str,
    /// Builds a fresh instance
    pub create: ViewConstructor,
}

impl ViewTypeDescriptor {
    pub const fn new(namespace: &'static str, name: &'static str, create: ViewConstructor) -> Self {
        Self {
            namespace,
            name,
            create,
        }
    }

    /// Fully-qualified name: `<namespace>.<name>`, or just the name when the
    /// namespace is empty.
    pub fn full_name(&self) -> String {
        qualify(self.namespace, self.name)
    }

    /// Serializable summary of this descriptor
    pub fn info(&self) -> ViewTypeInfo {
        ViewTypeInfo {
            namespace: self.namespace.to_string(),
            name: self.name.to_string(),
            full_name: self.full_name(),
        }
    }
}

/// Owned, serializable description of a view type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewTypeInfo {
    pub namespace: String,
    pub name: String,
    pub full_name: String,
}

/// Join a namespace and a simple name the way type names are displayed.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", namespace, name)
    }
}

/// Default-constructs `T` as a boxed view. Used by [`export_views!`](crate::export_views).
pub fn construct_default<T>() -> Result<Box<dyn View>, ViewError>
where
    T: View + Default + 'static,
{
    Ok(Box::new(T::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Blank;

    impl View for Blank {
        fn title(&self) -> String {
            "blank".to_string()
        }

        fn render(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_full_name_joins_namespace() {
        let desc = ViewTypeDescriptor::new("Demo.Views", "Blank", construct_default::<Blank>);
        assert_eq!(desc.full_name(), "Demo.Views.Blank");
    }

    #[test]
    fn test_full_name_without_namespace() {
        let desc = ViewTypeDescriptor::new("", "Blank", construct_default::<Blank>);
        assert_eq!(desc.full_name(), "Blank");
    }

    #[test]
    fn test_construct_default_builds_view() {
        let desc = ViewTypeDescriptor::new("Demo", "Blank", construct_default::<Blank>);
        let view = (desc.create)().unwrap();
        assert_eq!(view.title(), "blank");
    }

    #[test]
    fn test_info_serializes() {
        let desc = ViewTypeDescriptor::new("Demo", "Blank", construct_default::<Blank>);
        let json = serde_json::to_string(&desc.info()).unwrap();
        assert!(json.contains("\"full_name\":\"Demo.Blank\""));
    }
}
