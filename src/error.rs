use thiserror::Error;

/// Failures while wiring the page into the browser or bringing up WebGL.
///
/// None of these are fatal to the site: the background degrades to a static
/// colour and the page content stays interactive.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element `{0}` not found")]
    MissingElement(String),
    #[error("WebGL2 is not available")]
    WebGlUnavailable,
    #[error("shader compile failed: {0}")]
    ShaderCompile(String),
    #[error("program link failed: {0}")]
    ProgramLink(String),
    #[error("GL resource allocation failed: {0}")]
    GlAlloc(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for SiteError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SiteError::Js(format!("{value:?}"))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SiteError> for wasm_bindgen::JsValue {
    fn from(err: SiteError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}

/// Contact submission failures. The form collapses all of them into a single
/// user-visible error state.
#[derive(Debug, Error)]
pub enum ContactError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("could not encode message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("endpoint answered with HTTP {0}")]
    Status(u16),
}
