/// Convenience result type used across the public flowmotion API.
pub type FlowResult<T> = Result<T, FlowError>;

/// Top-level error type for flowmotion.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    /// Input data failed validation (bad block move, malformed id, ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation is not allowed in the current playback or stage state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Engine configuration is inconsistent.
    #[error("config error: {0}")]
    Config(String),

    /// Project or config JSON could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Build a [`FlowError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FlowError::InvalidState`] value.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Build a [`FlowError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`FlowError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Returns `true` for errors a caller can recover from by changing state first
    /// (for example calling `stop()` before `play()`).
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState(_))
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        Self::serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
