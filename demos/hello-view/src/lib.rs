//! Hello View - A simple example view module for hotswap
//!
//! This module demonstrates:
//! - Exporting view types with the `export_views!` macro
//! - Implementing the `View` trait
//! - A build marker that shows which build is on display
//!
//! ## Building
//!
//! ```bash
//! cargo build --release
//! ```
//!
//! ## Installing
//!
//! ```bash
//! mkdir -p ~/Documents/hotswap
//! cp target/release/libhello_view.so ~/Documents/hotswap/
//! hotswap reload
//! ```
//!
//! Edit `BUILD_MARKER` (or build with `HELLO_VIEW_BUILD_MARKER=...`), rebuild,
//! copy again, and reload: the running host picks up the new build without
//! restarting.

use hotswap_view_api::{View, export_views};

/// Bump this between builds to watch the swap happen.
/// `HELLO_VIEW_BUILD_MARKER` at compile time overrides it.
const BUILD_MARKER: &str = match option_env!("HELLO_VIEW_BUILD_MARKER") {
    Some(marker) => marker,
    None => "build 1",
};

/// Greets whoever is looking at the display.
pub struct HelloView {
    greeting: String,
}

impl Default for HelloView {
    fn default() -> Self {
        let user = std::env::var("USER").unwrap_or_else(|_| "there".to_string());
        Self {
            greeting: format!("Hello, {}!", user),
        }
    }
}

impl View for HelloView {
    fn title(&self) -> String {
        "Hello".to_string()
    }

    fn render(&self) -> String {
        format!("{}\n({})", self.greeting, BUILD_MARKER)
    }
}

/// Shows how long the module image has been loaded.
pub struct UptimeView {
    loaded_at: std::time::Instant,
}

impl Default for UptimeView {
    fn default() -> Self {
        Self {
            loaded_at: std::time::Instant::now(),
        }
    }
}

impl View for UptimeView {
    fn title(&self) -> String {
        "Uptime".to_string()
    }

    fn render(&self) -> String {
        format!(
            "Instantiated {:.1}s ago ({})",
            self.loaded_at.elapsed().as_secs_f32(),
            BUILD_MARKER
        )
    }
}

// This macro generates the C ABI entry points for dynamic loading
export_views!("Demo.Views" => [HelloView, UptimeView]);
