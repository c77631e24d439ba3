/// Convenience result type used across fieldviz.
pub type VizResult<T> = Result<T, VizError>;

/// Top-level error taxonomy used by the plotting and export APIs.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Grid, tensor and time vector disagree on their dimensions.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Invalid caller-provided data or options.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while drawing onto a canvas.
    #[error("render error: {0}")]
    Render(String),

    /// A single animation encoder failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Every encoder in the export chain failed.
    #[error("no animation backend available ({})", .attempts.join("; "))]
    NoBackend {
        /// One `"<encoder>: <error>"` entry per failed attempt, in attempt order.
        attempts: Vec<String>,
    },

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    /// Build a [`VizError::Shape`] value.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Build a [`VizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VizError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`VizError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`VizError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for caller-side precondition failures (bad shapes, indices or options).
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::Shape(_) | Self::Validation(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
