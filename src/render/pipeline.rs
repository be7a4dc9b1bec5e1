use std::{
    borrow::Cow,
    collections::HashMap,
    path::{Path, PathBuf},
};

use image::{DynamicImage, RgbaImage};
use rayon::prelude::*;

use crate::{
    assets::{
        decode::decode_image,
        font::FontResolver,
        resolver::{AssetRef, AssetResolver, AssetSet},
    },
    effects::filters::apply_filter,
    foundation::{
        error::{PressError, PressResult},
        math::Fnv1a64,
    },
    layout::{
        geometry::DeviceGeometry,
        scale::{ScaleContext, ScaleInput},
    },
    render::{
        canvas::Canvas,
        compositor::{Compositor, prepare_image_raster, prepare_text_raster},
        text::TextRasterizer,
    },
    scene::model::{ImageKind, ImageLayer, LayerSpec},
};

/// Everything one composite needs: canvas sizing, asset references and the layer list.
#[derive(Clone, Debug)]
pub struct RenderJob {
    /// Canvas and design sizes.
    pub scale: ScaleInput,
    /// Asset references for image layers.
    pub assets: AssetSet,
    /// Layers in paint order (first is bottom-most).
    pub layers: Vec<LayerSpec>,
}

/// What to do when a color filter fails on a layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterFailurePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Log a warning and draw the unfiltered source instead.
    UseSource,
}

/// Threading for image-layer preparation (filter, resize, rotate).
///
/// Compositing itself is always sequential; the output does not depend on these settings.
#[derive(Clone, Debug, Default)]
pub struct PrepareThreading {
    /// Prepare image layers on a rayon pool.
    pub parallel: bool,
    /// Pool size; `None` lets rayon decide. `Some(0)` is rejected.
    pub threads: Option<usize>,
}

/// Knobs for [`Pipeline`].
#[derive(Clone, Debug, Default)]
pub struct PipelineOpts {
    /// Filter failure handling.
    pub filter_failure: FilterFailurePolicy,
    /// Image preparation threading.
    pub threading: PrepareThreading,
}

/// Per-run counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RenderStats {
    /// Layers in the job.
    pub layers_total: u64,
    /// Layers that went through compositing (including empty text).
    pub layers_drawn: u64,
    /// Image layers whose asset was skipped.
    pub layers_skipped: u64,
    /// Layers drawn unfiltered after a filter failure.
    pub filters_bypassed: u64,
}

/// Dry-run description of one layer, as produced by [`Pipeline::inspect`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LayerReport {
    /// Position in the paint order.
    pub index: usize,
    /// `"text"` or `"image"`.
    #[serde(rename = "type")]
    pub layer_type: &'static str,
    /// Asset slot for image layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ImageKind>,
    /// Whether the layer would be skipped.
    pub skipped: bool,
    /// Device geometry; absent for skipped layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<DeviceGeometry>,
    /// Filter name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<&'static str>,
}

/// A layer's raster, ready to paste.
struct PreparedRaster {
    raster: RgbaImage,
    left: i32,
    top: i32,
    filter_bypassed: bool,
}

enum LayerPlan<'a> {
    Skip,
    Image {
        index: usize,
        layer: &'a ImageLayer,
        geometry: DeviceGeometry,
        source: &'a DynamicImage,
    },
    Text {
        index: usize,
        text: &'a str,
        geometry: DeviceGeometry,
    },
}

/// Composites [`RenderJob`]s using injected asset and font resolvers.
pub struct Pipeline {
    assets: Box<dyn AssetResolver>,
    fonts: Box<dyn FontResolver>,
    opts: PipelineOpts,
}

impl Pipeline {
    /// Build a pipeline.
    pub fn new(
        assets: impl AssetResolver + 'static,
        fonts: impl FontResolver + 'static,
        opts: PipelineOpts,
    ) -> Self {
        Self {
            assets: Box::new(assets),
            fonts: Box::new(fonts),
            opts,
        }
    }

    /// Options this pipeline was built with.
    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    /// Composite `job` and return the canvas.
    pub fn render(&self, job: &RenderJob) -> PressResult<Canvas> {
        self.render_with_stats(job).map(|(canvas, _)| canvas)
    }

    /// Composite `job` and write it as PNG to `out`.
    pub fn render_to_png(&self, job: &RenderJob, out: &Path) -> PressResult<RenderStats> {
        let (canvas, stats) = self.render_with_stats(job)?;
        canvas.save_png(out)?;
        tracing::info!(path = %out.display(), "wrote composite");
        Ok(stats)
    }

    /// Composite `job`, also returning per-run counters.
    ///
    /// Steps:
    /// 1. derive the scale context and validate threading
    /// 2. fetch and decode each referenced asset once
    /// 3. prepare image rasters (optionally in parallel)
    /// 4. resolve the font if any text layer exists
    /// 5. walk layers in order, rendering text and compositing each raster
    #[tracing::instrument(skip_all, fields(layers = job.layers.len(), w = job.scale.cwidth, h = job.scale.cheight))]
    pub fn render_with_stats(&self, job: &RenderJob) -> PressResult<(Canvas, RenderStats)> {
        let scale = ScaleContext::from_input(&job.scale)?;
        let pool = if self.opts.threading.parallel {
            Some(build_thread_pool(self.opts.threading.threads)?)
        } else {
            None
        };

        let sources = self.load_sources(job)?;
        let plans = plan_layers(job, &scale, &sources)?;

        let images: Vec<PressResult<Option<PreparedRaster>>> = match &pool {
            Some(pool) => pool.install(|| {
                plans
                    .par_iter()
                    .map(|p| self.prepare_image(p))
                    .collect()
            }),
            None => plans.iter().map(|p| self.prepare_image(p)).collect(),
        };

        let font = if plans.iter().any(|p| matches!(p, LayerPlan::Text { .. })) {
            Some(self.fonts.resolve()?)
        } else {
            None
        };

        let mut compositor = Compositor::new(job.scale.cwidth, job.scale.cheight)?;
        let mut text = TextRasterizer::new();
        let mut stats = RenderStats {
            layers_total: job.layers.len() as u64,
            ..RenderStats::default()
        };

        for (plan, image) in plans.iter().zip(images) {
            let prepared = match plan {
                LayerPlan::Skip => {
                    stats.layers_skipped += 1;
                    continue;
                }
                LayerPlan::Image { .. } => image?,
                LayerPlan::Text {
                    index,
                    text: content,
                    geometry,
                } => {
                    let font = font
                        .as_ref()
                        .ok_or_else(|| PressError::render("no font resolved for text layer"))?;
                    tracing::debug!(layer = index, "rendering text layer");
                    match text.rasterize(content, font)? {
                        Some(raster) => Some(PreparedRaster {
                            raster: prepare_text_raster(&raster, geometry)?,
                            left: geometry.left,
                            top: geometry.top,
                            filter_bypassed: false,
                        }),
                        None => None,
                    }
                }
            };

            stats.layers_drawn += 1;
            if let Some(p) = prepared {
                if p.filter_bypassed {
                    stats.filters_bypassed += 1;
                }
                compositor.draw(&p.raster, p.left, p.top)?;
            }
        }

        tracing::info!(
            drawn = stats.layers_drawn,
            skipped = stats.layers_skipped,
            bypassed = stats.filters_bypassed,
            "composite finished"
        );
        Ok((compositor.into_canvas(), stats))
    }

    /// Describe what each layer would do without fetching assets or drawing.
    pub fn inspect(&self, job: &RenderJob) -> PressResult<Vec<LayerReport>> {
        let scale = ScaleContext::from_input(&job.scale)?;
        Ok(job
            .layers
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                let (kind, filter) = match layer {
                    LayerSpec::Image(img) => (Some(img.kind), img.filter.as_ref().map(|f| f.name())),
                    LayerSpec::Text(_) => (None, None),
                };
                let skipped = kind.is_some_and(|k| job.assets.get(k).is_skip());
                LayerReport {
                    index,
                    layer_type: layer.type_name(),
                    kind,
                    skipped,
                    geometry: (!skipped)
                        .then(|| DeviceGeometry::from_placement(layer.placement(), &scale)),
                    filter,
                }
            })
            .collect())
    }

    /// Fetch and decode each asset some non-skipped image layer draws, once per kind.
    fn load_sources(&self, job: &RenderJob) -> PressResult<HashMap<ImageKind, DynamicImage>> {
        let mut out = HashMap::new();
        for kind in ImageKind::ALL {
            let AssetRef::Reference(reference) = job.assets.get(kind) else {
                continue;
            };
            let used = job
                .layers
                .iter()
                .any(|l| matches!(l, LayerSpec::Image(img) if img.kind == kind));
            if !used {
                continue;
            }

            let bytes = self.assets.fetch(reference)?;
            let image = decode_image(&bytes)
                .map_err(|e| PressError::asset(format!("{kind} asset '{reference}': {e}")))?;
            tracing::debug!(
                %kind,
                reference = reference.as_str(),
                w = image.width(),
                h = image.height(),
                "loaded asset"
            );
            out.insert(kind, image);
        }
        Ok(out)
    }

    fn prepare_image(&self, plan: &LayerPlan<'_>) -> PressResult<Option<PreparedRaster>> {
        let LayerPlan::Image {
            index,
            layer,
            geometry,
            source,
        } = plan
        else {
            return Ok(None);
        };

        let (filtered, filter_bypassed) = match &layer.filter {
            None => (Cow::Borrowed(*source), false),
            Some(filter) => {
                settle_filter(source, apply_filter(source, filter), self.opts.filter_failure, *index)?
            }
        };

        Ok(Some(PreparedRaster {
            raster: prepare_image_raster(&filtered, geometry)?,
            left: geometry.left,
            top: geometry.top,
            filter_bypassed,
        }))
    }
}

/// Apply `policy` to a filter outcome. Returns the raster to draw and whether the filter
/// was bypassed. Only [`PressError::Filter`] is recoverable.
fn settle_filter<'s>(
    source: &'s DynamicImage,
    outcome: PressResult<DynamicImage>,
    policy: FilterFailurePolicy,
    index: usize,
) -> PressResult<(Cow<'s, DynamicImage>, bool)> {
    match outcome {
        Ok(img) => Ok((Cow::Owned(img), false)),
        Err(e) if e.is_filter() && policy == FilterFailurePolicy::UseSource => {
            tracing::warn!(layer = index, error = %e, "filter failed, drawing unfiltered source");
            Ok((Cow::Borrowed(source), true))
        }
        Err(e) => Err(e),
    }
}

fn plan_layers<'a>(
    job: &'a RenderJob,
    scale: &ScaleContext,
    sources: &'a HashMap<ImageKind, DynamicImage>,
) -> PressResult<Vec<LayerPlan<'a>>> {
    job.layers
        .iter()
        .enumerate()
        .map(|(index, layer)| match layer {
            LayerSpec::Image(img) => {
                if job.assets.get(img.kind).is_skip() {
                    return Ok(LayerPlan::Skip);
                }
                let source = sources.get(&img.kind).ok_or_else(|| {
                    PressError::render(format!("layer {index}: {} asset was not loaded", img.kind))
                })?;
                Ok(LayerPlan::Image {
                    index,
                    layer: img,
                    geometry: DeviceGeometry::from_placement(&img.placement, scale),
                    source,
                })
            }
            LayerSpec::Text(t) => Ok(LayerPlan::Text {
                index,
                text: &t.text,
                geometry: DeviceGeometry::from_placement(&t.placement, scale),
            }),
        })
        .collect()
}

/// Content-derived output path: `<dir>/<12 hex digits>.png`.
///
/// Identical jobs map to the same file name.
pub fn default_output_path(dir: &Path, job: &RenderJob) -> PressResult<PathBuf> {
    let mut h = Fnv1a64::new_default();
    for v in [
        job.scale.cwidth,
        job.scale.cheight,
        job.scale.small_w,
        job.scale.small_h,
    ] {
        h.write_bytes(&v.to_le_bytes());
    }
    for kind in ImageKind::ALL {
        h.write_field(job.assets.get(kind).reference().unwrap_or("-"));
    }
    let layers = serde_json::to_string(&job.layers)
        .map_err(|e| PressError::serde(format!("serialize layers for naming: {e}")))?;
    h.write_field(&layers);

    let name = format!("{:012x}.png", h.finish() & 0xffff_ffff_ffff);
    Ok(dir.join(name))
}

fn build_thread_pool(threads: Option<usize>) -> PressResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PressError::config(
            "prepare threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PressError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
