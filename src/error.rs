//! Crate-wide error type.

/// Errors surfaced by the platform-independent core.
///
/// The page itself never fails on a bad color (it renders black); callers
/// that parse explicitly get a typed error instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid hex color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid page config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(target_arch = "wasm32")]
impl From<Error> for wasm_bindgen::JsValue {
    fn from(err: Error) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
