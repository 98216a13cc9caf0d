//! Converter trait and failure type.

use indexmap::IndexMap;

/// Trait for implementing converters.
///
/// A converter takes a mapping restricted to its predecessor types and
/// produces values for (a subset of) its successor types. The engine never
/// looks inside: the predecessor and successor sets live on the graph edge
/// the converter is registered under, and the callable itself is opaque.
pub trait Converter<T, V>: Send + Sync {
    /// Run the conversion.
    ///
    /// `inputs` holds exactly the edge's predecessor types. The output need
    /// not cover every declared successor.
    fn convert(&self, inputs: &IndexMap<T, V>) -> Result<IndexMap<T, V>, ConvertError>;
}

impl<T, V, F> Converter<T, V> for F
where
    F: Fn(&IndexMap<T, V>) -> Result<IndexMap<T, V>, ConvertError> + Send + Sync,
{
    fn convert(&self, inputs: &IndexMap<T, V>) -> Result<IndexMap<T, V>, ConvertError> {
        self(inputs)
    }
}

/// Errors that can occur during conversion.
///
/// From the engine's point of view these are recoverable: the failing edge
/// is abandoned and the search continues on other routes.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("conversion failed: {0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
