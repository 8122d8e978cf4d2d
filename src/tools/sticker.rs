//! Sticker overlay state: magic-wand cleanup, outline and contrast, upscaled export.

use crate::{
    assets::{
        codec::encode_png,
        slot::{ImageSlot, LoadTicket, SlotUpdate},
    },
    config::StickerSettings,
    effects::{
        composite::{premultiply, unpremultiply},
        outline::{OutlineSpec, synthesize_outline},
        wand::{EraseMode, EraseReport, remove_background},
    },
    foundation::{
        core::{SeedPoint, Tolerance},
        error::{ForgeError, ForgeResult},
        raster::RasterImage,
    },
    tools::Export,
};

pub struct StickerSession {
    slot: ImageSlot,
    tolerance: Tolerance,
    mode: EraseMode,
    outline: OutlineSpec,
    export_name: String,
    export_scale: u32,
}

impl StickerSession {
    pub fn new(settings: &StickerSettings) -> ForgeResult<Self> {
        if settings.export_scale == 0 {
            return Err(ForgeError::validation("export_scale must be > 0"));
        }
        Ok(Self {
            slot: ImageSlot::new(),
            tolerance: settings.tolerance()?,
            mode: EraseMode::default(),
            outline: settings.outline(),
            export_name: settings.export_name.clone(),
            export_scale: settings.export_scale,
        })
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.slot.begin_load()
    }

    pub fn complete_load(&mut self, ticket: LoadTicket, bytes: &[u8]) -> SlotUpdate {
        self.slot.complete_bytes(ticket, bytes)
    }

    pub fn set_image(&mut self, image: RasterImage) {
        self.slot.set(image);
    }

    /// The working buffer, with every erase so far applied.
    pub fn image(&self) -> Option<&RasterImage> {
        self.slot.image()
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn set_tolerance(&mut self, tolerance: Tolerance) {
        self.tolerance = tolerance;
    }

    pub fn mode(&self) -> EraseMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: EraseMode) {
        self.mode = mode;
    }

    pub fn outline(&self) -> &OutlineSpec {
        &self.outline
    }

    pub fn set_outline(&mut self, outline: OutlineSpec) {
        self.outline = outline;
    }

    /// Erase around `seed` in the working buffer. Erases accumulate.
    pub fn erase_at(&mut self, seed: SeedPoint) -> ForgeResult<EraseReport> {
        let (tolerance, mode) = (self.tolerance, self.mode);
        let image = self
            .slot
            .image_mut()
            .ok_or_else(|| ForgeError::empty_buffer("no sticker image loaded"))?;
        let report = remove_background(image, seed, tolerance, mode)?;
        tracing::info!(
            x = seed.x,
            y = seed.y,
            erased = report.erased,
            remaining_transparent = image.transparent_count(),
            "magic wand applied"
        );
        Ok(report)
    }

    /// Erase at a click inside a `view_w` x `view_h` preview of the buffer.
    pub fn erase_at_view(
        &mut self,
        view_x: f64,
        view_y: f64,
        view_w: f64,
        view_h: f64,
    ) -> ForgeResult<EraseReport> {
        let (w, h) = self
            .slot
            .image()
            .map(|img| (img.width(), img.height()))
            .ok_or_else(|| ForgeError::empty_buffer("no sticker image loaded"))?;
        let seed = SeedPoint::from_view(view_x, view_y, view_w, view_h, w, h)?;
        self.erase_at(seed)
    }

    /// Apply the outline and contrast settings to the working buffer.
    pub fn render(&self) -> ForgeResult<RasterImage> {
        let image = self
            .slot
            .image()
            .ok_or_else(|| ForgeError::empty_buffer("no sticker image loaded"))?;
        synthesize_outline(image, &self.outline)?.render(image)
    }

    /// Render, upscale by the configured factor, and encode.
    pub fn export(&self) -> ForgeResult<Export> {
        let rendered = self.render()?;
        let scaled = upscale(&rendered, self.export_scale)?;
        Ok(Export {
            file_name: self.export_name.clone(),
            png: encode_png(&scaled)?,
        })
    }

    pub fn close(&mut self) {
        self.slot.close();
    }
}

/// Resize by an integer factor with bilinear filtering.
///
/// Filtering runs on premultiplied pixels so the RGB of transparent pixels
/// never bleeds into visible edges.
pub fn upscale(img: &RasterImage, scale: u32) -> ForgeResult<RasterImage> {
    if scale == 0 {
        return Err(ForgeError::validation("scale must be > 0"));
    }
    if scale == 1 || img.is_empty() {
        return Ok(img.clone());
    }
    let (w, h) = img
        .width()
        .checked_mul(scale)
        .zip(img.height().checked_mul(scale))
        .ok_or_else(|| ForgeError::validation("scaled size overflows u32"))?;
    let mut rgba = img.to_rgba_image()?;
    for px in rgba.pixels_mut() {
        px.0 = premultiply(px.0);
    }
    let mut resized = image::imageops::resize(&rgba, w, h, image::imageops::FilterType::Triangle);
    for px in resized.pixels_mut() {
        px.0 = unpremultiply(px.0);
    }
    Ok(RasterImage::from_rgba_image(resized))
}

#[cfg(test)]
#[path = "../../tests/unit/tools/sticker.rs"]
mod tests;
