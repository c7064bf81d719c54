//! hotswap-view-api - View API for hotswap modules
//!
//! This crate provides the traits and types needed to build a view module:
//! a native dynamic library whose view types the hotswap host can load,
//! instantiate, and swap into a running display without restarting.
//!
//! # Example
//!
//! ```ignore
//! use hotswap_view_api::{View, export_views};
//!
//! #[derive(Default)]
//! pub struct HelloView;
//!
//! impl View for HelloView {
//!     fn title(&self) -> String {
//!         "Hello".to_string()
//!     }
//!
//!     fn render(&self) -> String {
//!         "Hello from a freshly loaded module!".to_string()
//!     }
//! }
//!
//! export_views!("Demo.Views" => [HelloView]);
//! ```

pub mod error;
pub mod types;

pub use error::ViewError;
pub use types::*;

/// Current view API version. Modules must match this exactly.
/// This is checked when a module image is materialized.
pub const VIEW_API_VERSION: u32 = 1;

/// Exported symbol returning the module's [`VIEW_API_VERSION`].
pub const API_VERSION_SYMBOL: &[u8] = b"_hotswap_view_api_version\0";

/// Exported symbol returning the module's view type table.
pub const VIEW_TYPES_SYMBOL: &[u8] = b"_hotswap_view_types\0";

/// A view that can be swapped into the host's display container.
///
/// Instances are created and used on the display's owning thread only, so
/// views do not need to be `Send`.
pub trait View {
    /// Title shown above the view
    fn title(&self) -> String;

    /// Render the view's current content
    fn render(&self) -> String;
}

/// Export view types for dynamic loading.
///
/// Every listed type must implement [`View`] and [`Default`]; `Default` is
/// the parameterless constructor the host calls. Types are enumerated in the
/// order they are listed.
///
/// # Usage
///
/// ```ignore
/// hotswap_view_api::export_views!(
///     "Demo.Views" => [HelloView, ClockView],
///     "Demo.Panels" => [StatusPanel],
/// );
/// ```
///
/// # Generated Functions
///
/// - `_hotswap_view_api_version()`: Returns the API version
/// - `_hotswap_view_types()`: Returns the static type table
#[macro_export]
macro_rules! export_views {
    ($($namespace:literal => [$($view:ident),* $(,)?]),* $(,)?) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn _hotswap_view_api_version() -> u32 {
            $crate::VIEW_API_VERSION
        }

        #[unsafe(no_mangle)]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn _hotswap_view_types() -> *const [$crate::ViewTypeDescriptor] {
            static TYPES: &[$crate::ViewTypeDescriptor] = &[
                $($(
                    $crate::ViewTypeDescriptor::new(
                        $namespace,
                        stringify!($view),
                        $crate::construct_default::<$view>,
                    ),
                )*)*
            ];
            TYPES as *const [$crate::ViewTypeDescriptor]
        }
    };
}
