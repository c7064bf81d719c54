//! A module that only gets half of the export contract right.
//!
//! It exports `_hotswap_view_api_version` but never `_hotswap_view_types`.
//! With the `wrong-version` feature the version it reports is one ahead of
//! the host's.

use hotswap_view_api::VIEW_API_VERSION;

#[unsafe(no_mangle)]
pub extern "C" fn _hotswap_view_api_version() -> u32 {
    if cfg!(feature = "wrong-version") {
        VIEW_API_VERSION + 1
    } else {
        VIEW_API_VERSION
    }
}
