//! Base directory paths for hotswap.
//!
//! Module artifacts and the configuration file live in a per-application
//! folder under the user's documents directory, which is where external build
//! scripts conventionally drop their output. Shadow copies of loaded modules
//! go to the cache directory so they never collide with the artifacts.

use std::path::PathBuf;

/// Application name used when none is configured.
pub const DEFAULT_APP_NAME: &str = "hotswap";

/// Get the per-application directory that module artifacts are resolved against.
///
/// Returns `$HOTSWAP_HOME` if set, otherwise `<documents>/<app_name>`, falling
/// back to `~/Documents/<app_name>` on systems without a documents folder.
///
/// # Examples
///
/// ```
/// use hotswap_paths::app_dir;
///
/// let dir = app_dir("hotreloaddemo");
/// let module = dir.join("demo.so");
/// ```
pub fn app_dir(app_name: &str) -> PathBuf {
    if let Ok(home) = std::env::var("HOTSWAP_HOME") {
        PathBuf::from(home)
    } else if let Some(documents) = dirs::document_dir() {
        documents.join(app_name)
    } else if let Some(home) = dirs::home_dir() {
        home.join("Documents").join(app_name)
    } else {
        PathBuf::from(app_name)
    }
}

/// Get the directory where loaded modules are shadow-copied before opening.
///
/// Returns `$HOTSWAP_SHADOW_DIR` if set, otherwise `<cache>/hotswap/shadow`,
/// falling back to the system temp directory.
pub fn shadow_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("HOTSWAP_SHADOW_DIR") {
        PathBuf::from(dir)
    } else if let Some(cache) = dirs::cache_dir() {
        cache.join("hotswap").join("shadow")
    } else {
        std::env::temp_dir().join("hotswap-shadow")
    }
}
