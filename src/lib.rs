//! Per-author previous/next navigation for MetaFilter comment threads.
//!
//! Built as a wasm content script: on load it indexes the comments on the
//! page by author and adds `« ≡ »` controls to every comment whose author
//! posted more than once. `≡` opens a jump list of that author's comments.

pub mod config;
pub mod error;
pub mod identity;
pub mod index;
pub mod models;
pub(crate) mod page;
pub mod picker;
pub mod render;

use crate::config::NavConfig;
use crate::error::NavErrorKind;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = NavConfig::load();
    let debug = config.debug;

    match page::init(config) {
        Ok(Some(session)) => {
            if debug {
                leptos::logging::log!(
                    "mefi-nav: ready ({} authors, {} navigation blocks)",
                    session.index.len(),
                    session.rendered
                );
            }
            // Listeners live for the page lifetime; nothing to clean up.
            session.keep_alive();
        }
        Ok(None) => {
            if debug {
                leptos::logging::log!("mefi-nav: already active on this page");
            }
        }
        Err(e) if e.kind == NavErrorKind::UnsupportedSite => {
            if debug {
                leptos::logging::log!("mefi-nav: {e}");
            }
        }
        Err(e) => leptos::logging::warn!("mefi-nav: disabled: {e}"),
    }
}
