use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a page feature could not be wired up. Only the failing feature is
/// skipped; the rest of the page keeps working.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("required element `{0}` is missing")]
    MissingElement(&'static str),
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        SetupError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
