//! Meme caption compositor.
//!
//! Captions are drawn uppercased, horizontally centered, with a black stroke
//! painted first and a white fill on top so the text stays legible over any
//! background. The top caption hangs down from `edge_margin_px` below the top
//! edge; the bottom caption sits on `edge_margin_px` above the bottom edge.

use vello_cpu::kurbo::{Affine, Stroke};

use crate::{
    effects::composite::over_premul_layer_in_place,
    foundation::{
        core::Rgba8,
        error::{ForgeError, ForgeResult},
        raster::RasterImage,
    },
    render::text::{CaptionFont, TextLayoutEngine},
};

/// Top and bottom caption text. Empty strings draw nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CaptionPair {
    pub top: String,
    pub bottom: String,
}

impl CaptionPair {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.bottom.is_empty()
    }
}

/// Caption sizing and colors, relative to the image width.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptionStyle {
    /// Font size as a fraction of image width.
    pub font_size_ratio: f32,
    /// Outline stroke width as a fraction of image width.
    pub stroke_ratio: f32,
    /// Distance from the top/bottom edge to the caption box, in pixels.
    pub edge_margin_px: f32,
    pub fill_rgba: Rgba8,
    pub stroke_rgba: Rgba8,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            font_size_ratio: 1.0 / 10.0,
            stroke_ratio: 1.0 / 150.0,
            edge_margin_px: 20.0,
            fill_rgba: [255, 255, 255, 255],
            stroke_rgba: [0, 0, 0, 255],
        }
    }
}

impl CaptionStyle {
    pub fn validate(&self) -> ForgeResult<()> {
        if !self.font_size_ratio.is_finite() || self.font_size_ratio <= 0.0 {
            return Err(ForgeError::validation("font_size_ratio must be finite and > 0"));
        }
        if !self.stroke_ratio.is_finite() || self.stroke_ratio < 0.0 {
            return Err(ForgeError::validation("stroke_ratio must be finite and >= 0"));
        }
        if !self.edge_margin_px.is_finite() {
            return Err(ForgeError::validation("edge_margin_px must be finite"));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Anchor {
    Top,
    Bottom,
}

/// Renders captions over images. Holds the text shaping state between calls.
pub struct Compositor {
    style: CaptionStyle,
    font: Option<CaptionFont>,
    engine: TextLayoutEngine,
}

impl Compositor {
    pub fn new(style: CaptionStyle) -> Self {
        Self {
            style,
            font: None,
            engine: TextLayoutEngine::new(),
        }
    }

    pub fn with_font(mut self, font: CaptionFont) -> Self {
        self.font = Some(font);
        self
    }

    pub fn set_font(&mut self, font: CaptionFont) {
        self.font = Some(font);
    }

    pub fn font(&self) -> Option<&CaptionFont> {
        self.font.as_ref()
    }

    pub fn style(&self) -> &CaptionStyle {
        &self.style
    }

    /// Draw `captions` over a copy of `image`.
    ///
    /// The source is never mutated, and the same inputs always give the same
    /// pixels. An empty image yields an empty output; empty captions yield an
    /// exact copy. A font is only required when there is text to draw.
    #[tracing::instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn compose(
        &mut self,
        image: &RasterImage,
        captions: &CaptionPair,
    ) -> ForgeResult<RasterImage> {
        if image.is_empty() {
            tracing::debug!("compose on empty image is a no-op");
            return Ok(RasterImage::empty());
        }
        let slots: Vec<(String, Anchor)> = [
            (&captions.top, Anchor::Top),
            (&captions.bottom, Anchor::Bottom),
        ]
        .into_iter()
        .filter(|(text, _)| !text.is_empty())
        .map(|(text, anchor)| (text.to_uppercase(), anchor))
        .collect();
        if slots.is_empty() {
            return Ok(image.clone());
        }

        self.style.validate()?;
        let font = self
            .font
            .clone()
            .ok_or_else(|| ForgeError::validation("no caption font loaded"))?;

        let w16: u16 = image
            .width()
            .try_into()
            .map_err(|_| ForgeError::validation("image width exceeds u16"))?;
        let h16: u16 = image
            .height()
            .try_into()
            .map_err(|_| ForgeError::validation("image height exceeds u16"))?;

        let width = image.width() as f32;
        let height = image.height() as f32;
        let size_px = width * self.style.font_size_ratio;
        let stroke_px = width * self.style.stroke_ratio;
        let font_data = font.font_data();

        let mut ctx = vello_cpu::RenderContext::new(w16, h16);
        for (text, anchor) in &slots {
            let layout = self.engine.layout_line(text, &font, size_px)?;
            let x = (width - layout.width()) / 2.0;
            let y = match anchor {
                Anchor::Top => self.style.edge_margin_px,
                Anchor::Bottom => height - self.style.edge_margin_px - layout.height(),
            };
            tracing::debug!(?anchor, x, y, text_width = layout.width(), "placing caption");

            ctx.set_transform(Affine::translate((f64::from(x), f64::from(y))));
            if stroke_px > 0.0 {
                ctx.set_stroke(Stroke::new(f64::from(stroke_px)));
                ctx.set_paint(color(self.style.stroke_rgba));
                draw_glyphs(&mut ctx, &layout, &font_data, GlyphPass::Stroke);
            }
            ctx.set_paint(color(self.style.fill_rgba));
            draw_glyphs(&mut ctx, &layout, &font_data, GlyphPass::Fill);
        }
        ctx.flush();

        let mut text_layer = vello_cpu::Pixmap::new(w16, h16);
        ctx.render_to_pixmap(&mut text_layer);

        let mut out = image.clone();
        over_premul_layer_in_place(out.as_bytes_mut(), text_layer.data_as_u8_slice())?;
        Ok(out)
    }
}

#[derive(Clone, Copy)]
enum GlyphPass {
    Stroke,
    Fill,
}

fn draw_glyphs(
    ctx: &mut vello_cpu::RenderContext,
    layout: &parley::Layout<()>,
    font: &vello_cpu::peniko::FontData,
    pass: GlyphPass,
) {
    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            let builder = ctx.glyph_run(font).font_size(run.run().font_size());
            match pass {
                GlyphPass::Stroke => builder.stroke_glyphs(glyphs),
                GlyphPass::Fill => builder.fill_glyphs(glyphs),
            }
        }
    }
}

fn color([r, g, b, a]: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/caption.rs"]
mod tests;
