//! HotSwapper - reloads a view module and swaps the result onto the display

use hotswap_view_api::ViewTypeInfo;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::display::Dispatcher;
use crate::error::HotReloadError;
use crate::loader::read_module;
use crate::resolver::TypeResolver;
use crate::target::ReloadTarget;

/// Where a reload is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadStage {
    Idle,
    PathResolved,
    BytesLoaded,
    ImageResolved,
    TypeResolved,
    Instantiated,
    Published,
}

impl fmt::Display for ReloadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::PathResolved => "path_resolved",
            Self::BytesLoaded => "bytes_loaded",
            Self::ImageResolved => "image_resolved",
            Self::TypeResolved => "type_resolved",
            Self::Instantiated => "instantiated",
            Self::Published => "published",
        };
        f.write_str(name)
    }
}

/// Configuration for HotSwapper
#[derive(Debug, Clone)]
pub struct HotSwapConfig {
    /// Directory that module file names are resolved against
    pub base_dir: PathBuf,
}

impl HotSwapConfig {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// On-disk location of the target's module artifact
    pub fn module_path(&self, target: &ReloadTarget) -> PathBuf {
        self.base_dir.join(target.module())
    }
}

/// Outcome of a successful reload
#[derive(Debug, Clone)]
pub struct SwapReport {
    pub target: ReloadTarget,
    /// Artifact that was read
    pub path: PathBuf,
    /// Fully-qualified name of the type that was instantiated
    pub type_name: String,
    /// Display generation of the new view
    pub generation: u64,
    /// Size of the artifact in bytes
    pub module_bytes: usize,
}

/// Drives a reload end to end: read, resolve, instantiate, publish.
///
/// Nothing is cached between calls. Every `reload` re-reads the artifact and
/// re-resolves the type, which is how rebuilt modules get picked up. The only
/// state shared between calls is what the display shows.
pub struct HotSwapper {
    config: HotSwapConfig,
    resolver: TypeResolver,
    display: Dispatcher,
}

impl HotSwapper {
    pub fn new(config: HotSwapConfig, resolver: TypeResolver, display: Dispatcher) -> Self {
        Self {
            config,
            resolver,
            display,
        }
    }

    pub fn config(&self) -> &HotSwapConfig {
        &self.config
    }

    pub fn resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    pub fn display(&self) -> &Dispatcher {
        &self.display
    }

    /// Reload `target` and swap the new instance onto the display.
    ///
    /// On error the display keeps its previous view.
    pub fn reload(&self, target: &ReloadTarget) -> Result<SwapReport, HotReloadError> {
        let mut stage = ReloadStage::Idle;
        let result = self.run_pipeline(target, &mut stage);

        match &result {
            Ok(report) => info!(
                target = %target,
                generation = report.generation,
                "Hot swap complete"
            ),
            Err(e) => error!(
                target = %target,
                stage = %stage,
                kind = e.kind(),
                error = %e,
                "Hot swap failed"
            ),
        }
        result
    }

    /// Reload every target in order. A failure does not stop later targets;
    /// the last successful one stays on display.
    pub fn reload_all(&self, targets: &[ReloadTarget]) -> Vec<Result<SwapReport, HotReloadError>> {
        targets.iter().map(|target| self.reload(target)).collect()
    }

    /// List the view types in a module, in enumeration order
    pub fn inspect(&self, module: &str) -> Result<Vec<ViewTypeInfo>, HotReloadError> {
        inspect_module(&self.config, &self.resolver, module)
    }

    fn run_pipeline(
        &self,
        target: &ReloadTarget,
        stage: &mut ReloadStage,
    ) -> Result<SwapReport, HotReloadError> {
        let path = self.config.module_path(target);
        advance(stage, ReloadStage::PathResolved, &path);

        let bytes = read_module(&path)?;
        advance(stage, ReloadStage::BytesLoaded, &path);

        let resolved = self
            .resolver
            .resolve(
                &bytes,
                target.module(),
                target.namespace(),
                target.type_name(),
            )
            .map_err(|e| HotReloadError::from_resolve(e, target.module()))?;
        advance(stage, ReloadStage::ImageResolved, &path);

        let type_name = resolved.full_name();
        let constructor = resolved.entry().constructor();
        advance(stage, ReloadStage::TypeResolved, &path);

        // Construct on the display thread, where the view will live
        let mounted_name = type_name.clone();
        let outcome = self.display.invoke(move |slot| {
            let view = match std::panic::catch_unwind(AssertUnwindSafe(|| constructor())) {
                Ok(Ok(view)) => view,
                Ok(Err(e)) => return Err(e.to_string()),
                Err(payload) => return Err(panic_message(payload.as_ref())),
            };
            Ok(slot.publish(mounted_name, view))
        })?;

        let generation = outcome.map_err(|detail| HotReloadError::Construction {
            type_name: type_name.clone(),
            detail,
        })?;
        advance(stage, ReloadStage::Instantiated, &path);
        advance(stage, ReloadStage::Published, &path);

        Ok(SwapReport {
            target: target.clone(),
            path,
            type_name,
            generation,
            module_bytes: bytes.len(),
        })
    }
}

/// List the view types in `module` without touching any display.
pub fn inspect_module(
    config: &HotSwapConfig,
    resolver: &TypeResolver,
    module: &str,
) -> Result<Vec<ViewTypeInfo>, HotReloadError> {
    let path = config.base_dir.join(module);
    let bytes = read_module(&path)?;
    let image = resolver
        .materialize(&bytes, module)
        .map_err(|source| HotReloadError::ImageLoad {
            module: module.to_string(),
            source,
        })?;
    Ok(image.types().iter().map(|entry| entry.info()).collect())
}

fn advance(stage: &mut ReloadStage, next: ReloadStage, path: &Path) {
    *stage = next;
    debug!(stage = %next, path = %path.display(), "Reload stage");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("constructor panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("constructor panicked: {}", s)
    } else {
        "constructor panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_path_joins_base_dir() {
        let config = HotSwapConfig::new("/docs/hotreloaddemo");
        let target = ReloadTarget::new("demo.so", "Demo.Views", "HelloView");
        assert_eq!(
            config.module_path(&target),
            PathBuf::from("/docs/hotreloaddemo/demo.so")
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ReloadStage::BytesLoaded.to_string(), "bytes_loaded");
        assert_eq!(ReloadStage::Published.to_string(), "published");
    }

    #[test]
    fn test_panic_message_extracts_text() {
        let payload: Box<dyn Any + Send> = Box::new("no parameterless constructor");
        assert_eq!(
            panic_message(payload.as_ref()),
            "constructor panicked: no parameterless constructor"
        );

        let payload: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(payload.as_ref()), "constructor panicked: boom");

        let payload: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(payload.as_ref()), "constructor panicked");
    }
}
