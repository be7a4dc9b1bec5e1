//! Turning a [`RenderJob`](pipeline::RenderJob) into pixels.
//!
//! [`pipeline`] drives a run; [`compositor`] places prepared rasters on the [`canvas`];
//! [`transform`] and [`text`] produce those rasters.

/// Output canvas.
pub mod canvas;
/// Per-layer paste and composite.
pub mod compositor;
/// Run driver.
pub mod pipeline;
/// Text shaping and rasterization.
pub mod text;
/// Resize and rotate.
pub mod transform;
