//! hotswap-core: Core library for live view-module swapping
//!
//! This crate reloads a view type from an externally built module artifact and
//! swaps a fresh instance of it onto a running display, without restarting the
//! host and without keeping the artifact locked:
//!
//! - **Content loading** - [`read_module`] reads the artifact in one call and releases it
//! - **Module images** - [`ImageLoader`] turns bytes into an enumerable [`ModuleImage`]
//! - **Type resolution** - [`TypeResolver`] picks the target type per a [`MatchPolicy`]
//! - **Display** - [`DisplayHost`] owns the single [`ViewSlot`]; [`Dispatcher`] marshals work onto it
//! - **Orchestration** - [`HotSwapper`] runs the whole pipeline on every call
//!
//! # Quick Start
//!
//! ```no_run
//! use hotswap_core::{DisplayHost, HotSwapConfig, HotSwapper, MatchPolicy, ReloadTarget, TypeResolver};
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let (display, _thread) = DisplayHost::spawn("display")?;
//!     let swapper = HotSwapper::new(
//!         HotSwapConfig::new(hotswap_paths::app_dir("hotreloaddemo")),
//!         TypeResolver::native(MatchPolicy::Exact),
//!         display,
//!     );
//!
//!     let target = ReloadTarget::new("libhello_view.so", "Demo.Views", "HelloView");
//!     let report = swapper.reload(&target)?;
//!     println!("now showing {} (generation {})", report.type_name, report.generation);
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ReloadTarget ──► read_module ──► ImageLoader ──► TypeResolver ──► Dispatcher ──► ViewSlot
//!                  (bytes)         (ModuleImage)   (ResolvedType)   construct +     (publish)
//!                                                                   publish on the
//!                                                                   display thread
//! ```

pub mod display;
pub mod error;
pub mod image;
pub mod loader;
pub mod resolver;
pub mod swapper;
pub mod target;

pub use display::{DispatchError, Dispatcher, DisplayHost, MountedView, ViewSlot, ViewSnapshot};
pub use error::HotReloadError;
pub use image::{ImageError, ImageLoader, ModuleImage, NativeImageLoader, SharedConstructor, TypeEntry};
pub use loader::{LoadError, read_module};
pub use resolver::{MatchPolicy, ResolveError, ResolvedType, TypeResolver};
pub use swapper::{HotSwapConfig, HotSwapper, ReloadStage, SwapReport, inspect_module};
pub use target::ReloadTarget;
