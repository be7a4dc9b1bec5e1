/// Convenience result type used across layerpress.
pub type PressResult<T> = Result<T, PressError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum PressError {
    /// Invalid run configuration: dimensions, color modes, threading, font config.
    #[error("configuration error: {0}")]
    Config(String),

    /// An asset or font could not be fetched, read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A color filter failed to produce an output raster.
    #[error("filter error: {0}")]
    Filter(String),

    /// Device geometry or raster buffers were unusable while compositing.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing job data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PressError {
    /// Build a [`PressError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`PressError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PressError::Filter`] value.
    pub fn filter(msg: impl Into<String>) -> Self {
        Self::Filter(msg.into())
    }

    /// Build a [`PressError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PressError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this error came out of a color filter.
    pub fn is_filter(&self) -> bool {
        matches!(self, Self::Filter(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
