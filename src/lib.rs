//! Animated "TV static" toy: noise panels, concentric patterns and springy
//! drag effects, driven by a live control panel.
//!
//! Everything numeric (color gradients, noise filters, pattern geometry,
//! springs, control state) is platform independent and tested natively.
//! The DOM wiring only exists on `wasm32`.

pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod noise;
pub mod pattern;
pub mod prism;
pub mod spring;

pub use color::Rgb;
pub use config::PageConfig;
pub use controls::{ControlAction, ControlState};
pub use error::{Error, Result};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    mod console;
    mod dom;
    mod gesture;
    mod page;
    mod render;

    pub use page::{live_drag_sessions, mount, TvStatic};

    thread_local! {
        static AUTO_MOUNTED: std::cell::RefCell<Option<TvStatic>> = const { std::cell::RefCell::new(None) };
    }

    /// Auto-mount into `#app` when the host page provides one. Its optional
    /// `data-config` attribute is a preset name or a JSON capability object.
    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console::init();
        let document = dom::document()?;
        let Some(host) = document.get_element_by_id("app") else {
            tracing::debug!("no #app element, waiting for an explicit mount");
            return Ok(());
        };
        let config = page::parse_config(host.get_attribute("data-config").as_deref())?;
        let handle = page::mount_into(&host, config)?;
        AUTO_MOUNTED.with(|slot| *slot.borrow_mut() = Some(handle));
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{live_drag_sessions, mount, TvStatic};
