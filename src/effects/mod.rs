//! Pixel operations that do not depend on layout.

/// Straight-alpha source-over compositing.
pub mod composite;
/// Color filters for image layers.
pub mod filters;
