use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    /// A parameter value could not be represented as UTF-8 text.
    ///
    /// Unreachable when parameters are built from Rust `String`s; kept for
    /// callers that assemble parameter values from raw bytes.
    #[error("Parameter value is not valid UTF-8 text: {0}")]
    Encoding(String),

    /// The catalog service could not be reached, returned a non-success
    /// status, or sent a body that could not be parsed.
    ///
    /// Deliberately distinct from an empty result list so callers can tell
    /// "no matching products" apart from "request failed".
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}
