use std::{collections::HashMap, sync::Arc};

use image::RgbaImage;

use crate::{
    assets::font::FontHandle,
    foundation::{
        error::{PressError, PressResult},
        math::unpremultiply_rgba8_in_place,
    },
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley layouts.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl TextBrushRgba8 {
    pub(crate) const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Shapes and rasterizes single-line text into tight, transparent RGBA images.
///
/// Text is always solid black. Registered fonts are cached by [`FontHandle::fingerprint`],
/// so a run that draws many text layers registers its font once.
pub struct TextRasterizer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    families: HashMap<u64, RegisteredFont>,
}

#[derive(Clone)]
struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

impl Default for TextRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRasterizer {
    /// Fresh Parley contexts with no registered fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Render `text` with `font`. Returns `None` when the text has no visible extent.
    #[tracing::instrument(level = "debug", skip(self, font), fields(chars = text.chars().count()))]
    pub fn rasterize(&mut self, text: &str, font: &FontHandle) -> PressResult<Option<RgbaImage>> {
        if text.is_empty() {
            return Ok(None);
        }

        let RegisteredFont { family, data: font_data } = self.register(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(font.size_px()));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::BLACK));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let width = layout.width().ceil();
        let height = layout.height().ceil();
        if !(width >= 1.0 && height >= 1.0) {
            return Ok(None);
        }
        let w16 = u16::try_from(width as u32)
            .map_err(|_| PressError::render(format!("text raster width {width} exceeds u16")))?;
        let h16 = u16::try_from(height as u32)
            .map_err(|_| PressError::render(format!("text raster height {height} exceeds u16")))?;

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font_data)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut pixmap);

        let mut rgba = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut rgba);
        RgbaImage::from_raw(u32::from(w16), u32::from(h16), rgba)
            .map(Some)
            .ok_or_else(|| PressError::render("text pixmap has an unexpected size"))
    }

    fn register(&mut self, font: &FontHandle) -> PressResult<RegisteredFont> {
        let key = font.fingerprint();
        if let Some(registered) = self.families.get(&key) {
            return Ok(registered.clone());
        }

        let shared: Arc<dyn AsRef<[u8]> + Send + Sync> = font.shared_bytes();
        let blob = vello_cpu::peniko::Blob::new(shared);
        let families = self.font_ctx.collection.register_fonts(blob.clone(), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            PressError::asset(format!("no font families found in '{}'", font.source()))
        })?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| PressError::asset("registered font family has no name"))?
            .to_string();

        let registered = RegisteredFont {
            family,
            data: vello_cpu::peniko::FontData::new(blob, font.index()),
        };
        self.families.insert(key, registered.clone());
        Ok(registered)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
