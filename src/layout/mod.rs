//! Design-space to device-pixel mapping.
//!
//! Layer geometry is authored against a reference ("small") design size. [`scale`] derives
//! the per-run ratios and [`geometry`] applies them to one layer.

/// Per-layer device geometry.
pub mod geometry;
/// Run-wide scale factors.
pub mod scale;
