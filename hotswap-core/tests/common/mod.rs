//! Shared test fixtures: a text module format that stands in for native
//! libraries, so reload tests run without building dylibs.
//!
//! ```text
//! hotswap-test-module
//! Demo.Views.HelloView v1
//! Demo.Views.Broken !fail
//! Demo.Views.Panicky !panic
//! ```
//!
//! Each line after the header declares `<namespace>.<Name> <marker>`. The
//! instantiated view renders its marker. `!fail` makes the constructor return
//! an error, `!panic` makes it panic.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::thread::JoinHandle;

use hotswap_core::{
    Dispatcher, DisplayHost, HotSwapConfig, HotSwapper, ImageError, ImageLoader, MatchPolicy,
    ModuleImage, TypeEntry, TypeResolver,
};
use hotswap_view_api::{View, ViewError};

pub const HEADER: &str = "hotswap-test-module";

pub struct MarkerView {
    type_name: String,
    marker: String,
}

impl View for MarkerView {
    fn title(&self) -> String {
        self.type_name.clone()
    }

    fn render(&self) -> String {
        self.marker.clone()
    }
}

/// Parses the text module format above
pub struct TextImageLoader;

impl ImageLoader for TextImageLoader {
    fn materialize(&self, bytes: &[u8], origin: &str) -> Result<ModuleImage, ImageError> {
        let malformed = |detail: &str| ImageError::Malformed {
            origin: origin.to_string(),
            detail: detail.to_string(),
        };

        let text = std::str::from_utf8(bytes).map_err(|_| malformed("not utf-8"))?;
        let mut lines = text.lines();
        if lines.next() != Some(HEADER) {
            return Err(malformed("missing header"));
        }

        let mut types = Vec::new();
        for line in lines.filter(|l| !l.trim().is_empty()) {
            let (full, marker) = line.split_once(' ').unwrap_or((line, ""));
            let (namespace, name) = full.rsplit_once('.').unwrap_or(("", full));
            let type_name = full.to_string();
            let marker = marker.to_string();

            types.push(TypeEntry::new(namespace, name, move || {
                match marker.as_str() {
                    "!fail" => Err(ViewError::Unavailable("refused to build".to_string())),
                    "!panic" => panic!("constructor exploded"),
                    _ => Ok(Box::new(MarkerView {
                        type_name: type_name.clone(),
                        marker: marker.clone(),
                    }) as Box<dyn View>),
                }
            }));
        }

        Ok(ModuleImage::new(origin, types))
    }
}

/// Write a text module with the given `(full_name, marker)` entries
pub fn write_module(path: &Path, entries: &[(&str, &str)]) {
    let mut text = String::from(HEADER);
    text.push('\n');
    for (full, marker) in entries {
        text.push_str(&format!("{} {}\n", full, marker));
    }
    std::fs::write(path, text).unwrap();
}

pub fn text_resolver(policy: MatchPolicy) -> TypeResolver {
    TypeResolver::new(Arc::new(TextImageLoader), policy)
}

/// A swapper over `base_dir` with its own display thread
pub fn swapper(base_dir: &Path, policy: MatchPolicy) -> (HotSwapper, JoinHandle<()>) {
    let (display, handle) = DisplayHost::spawn("test-display").unwrap();
    let swapper = HotSwapper::new(
        HotSwapConfig::new(base_dir),
        text_resolver(policy),
        display,
    );
    (swapper, handle)
}

pub fn display_of(swapper: &HotSwapper) -> Dispatcher {
    swapper.display().clone()
}
