//! Layerpress composites a list of image and text layers onto a single PNG canvas.
//!
//! Layers are authored in a small reference coordinate space and scaled to the output
//! canvas. Image layers draw one of three job-level assets (logo, name, background), each
//! optionally recolored by a CSS-like filter; text layers draw solid black text. Layers are
//! painted in list order.
//!
//! The entry point is [`Pipeline`]:
//!
//! - build a [`RenderJob`] from a [`ScaleInput`], an [`AssetSet`] and parsed layers
//! - pick an [`AssetResolver`] and a [`FontResolver`]
//! - call [`Pipeline::render`] or [`Pipeline::render_to_png`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Assets, fonts and colors.
pub mod assets;
/// Filters and compositing math.
pub mod effects;
/// Scale and device geometry.
pub mod layout;
/// Rasterization and the run driver.
pub mod render;
/// Layer model.
pub mod scene;

pub use crate::foundation::error::{PressError, PressResult};

pub use crate::assets::color::TintColor;
pub use crate::assets::font::{
    ConfiguredFontResolver, DEFAULT_FONT_SIZE_PX, FixedFontResolver, FontHandle, FontResolver,
};
pub use crate::assets::resolver::{
    AssetRef, AssetResolver, AssetSet, DefaultAssetResolver, InMemoryAssetResolver,
};
pub use crate::layout::geometry::DeviceGeometry;
pub use crate::layout::scale::{ScaleContext, ScaleInput};
pub use crate::render::canvas::Canvas;
pub use crate::render::pipeline::{
    FilterFailurePolicy, LayerReport, Pipeline, PipelineOpts, PrepareThreading, RenderJob,
    RenderStats, default_output_path,
};
pub use crate::scene::model::{FilterSpec, ImageKind, LayerSpec, parse_layers};
