//! Sticker halo outline.
//!
//! The halo is an 8-direction stack of offset silhouettes painted in a solid
//! color beneath the image: offsets `(±w, 0)`, `(0, ±w)` and `(±w, ±w)`. This
//! approximates a stroke; it is not a morphological dilation of the alpha
//! channel, so large widths on non-convex shapes leave small notches between
//! the offset copies.

use crate::{
    effects::composite::over_straight,
    foundation::{
        core::Rgba8,
        error::{ForgeError, ForgeResult},
        raster::RasterImage,
    },
};

/// User-facing outline parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OutlineSpec {
    /// Halo offset in pixels. `0` disables the halo.
    pub width: u32,
    /// Contrast adjustment in percent on top of 100%.
    pub contrast_pct: f32,
    /// Halo color.
    pub color: Rgba8,
}

impl Default for OutlineSpec {
    fn default() -> Self {
        Self {
            width: 5,
            contrast_pct: 0.0,
            color: [255, 255, 255, 255],
        }
    }
}

/// One offset copy of the silhouette.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HaloLayer {
    pub dx: i64,
    pub dy: i64,
}

/// Declarative description of a sticker render over a `width x height` source.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSpec {
    pub width: u32,
    pub height: u32,
    /// Offset silhouettes, painted in order beneath the source. Empty means no halo.
    pub halo: Vec<HaloLayer>,
    pub halo_color: Rgba8,
    /// Contrast multiplier, `1.0` is identity.
    pub contrast: f32,
}

/// Describe the halo and contrast pass for `rendered`.
pub fn synthesize_outline(rendered: &RasterImage, spec: &OutlineSpec) -> ForgeResult<RenderSpec> {
    if !spec.contrast_pct.is_finite() {
        return Err(ForgeError::validation("contrast_pct must be finite"));
    }
    let contrast = ((100.0 + spec.contrast_pct) / 100.0).max(0.0);

    let halo = if spec.width == 0 {
        Vec::new()
    } else {
        let w = i64::from(spec.width);
        [
            (w, 0),
            (-w, 0),
            (0, w),
            (0, -w),
            (w, w),
            (-w, -w),
            (w, -w),
            (-w, w),
        ]
        .into_iter()
        .map(|(dx, dy)| HaloLayer { dx, dy })
        .collect()
    };

    Ok(RenderSpec {
        width: rendered.width(),
        height: rendered.height(),
        halo,
        halo_color: spec.color,
        contrast,
    })
}

impl RenderSpec {
    pub fn is_passthrough(&self) -> bool {
        self.halo.is_empty() && self.contrast == 1.0
    }

    /// Rasterize the halo stack beneath `source`, then apply contrast.
    ///
    /// Output has the source dimensions; halo pixels pushed past the edge are clipped.
    #[tracing::instrument(skip(self, source), fields(layers = self.halo.len(), contrast = self.contrast))]
    pub fn render(&self, source: &RasterImage) -> ForgeResult<RasterImage> {
        if source.width() != self.width || source.height() != self.height {
            return Err(ForgeError::validation(format!(
                "render spec is for {}x{}, got a {}x{} source",
                self.width,
                self.height,
                source.width(),
                source.height()
            )));
        }
        if source.is_empty() || self.is_passthrough() {
            return Ok(source.clone());
        }

        let mut out = if self.halo.is_empty() {
            source.clone()
        } else {
            let mut out = RasterImage::new(self.width, self.height)?;
            for layer in &self.halo {
                paint_silhouette(&mut out, source, *layer, self.halo_color);
            }
            for (d, s) in out
                .as_bytes_mut()
                .chunks_exact_mut(4)
                .zip(source.as_bytes().chunks_exact(4))
            {
                let px = over_straight([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
                d.copy_from_slice(&px);
            }
            out
        };

        if self.contrast != 1.0 {
            apply_contrast(&mut out, self.contrast);
        }
        Ok(out)
    }
}

fn paint_silhouette(dst: &mut RasterImage, source: &RasterImage, layer: HaloLayer, color: Rgba8) {
    let (w, h) = (i64::from(source.width()), i64::from(source.height()));
    for sy in 0..h {
        let ty = sy + layer.dy;
        if ty < 0 || ty >= h {
            continue;
        }
        for sx in 0..w {
            let tx = sx + layer.dx;
            if tx < 0 || tx >= w {
                continue;
            }
            let sa = source.as_bytes()[source.index(sx as u32, sy as u32) + 3];
            if sa == 0 {
                continue;
            }
            let a = ((u16::from(sa) * u16::from(color[3]) + 127) / 255) as u8;
            let i = dst.index(tx as u32, ty as u32);
            let d = &mut dst.as_bytes_mut()[i..i + 4];
            let px = over_straight([d[0], d[1], d[2], d[3]], [color[0], color[1], color[2], a]);
            d.copy_from_slice(&px);
        }
    }
}

/// Linear contrast on straight RGB: `c' = (c - 0.5) * k + 0.5`. Alpha is untouched.
pub fn apply_contrast(img: &mut RasterImage, k: f32) {
    let lut: Vec<u8> = (0..=255u16)
        .map(|c| {
            let v = ((f32::from(c) / 255.0 - 0.5) * k + 0.5) * 255.0;
            v.round().clamp(0.0, 255.0) as u8
        })
        .collect();
    for px in img.as_bytes_mut().chunks_exact_mut(4) {
        for c in px.iter_mut().take(3) {
            *c = lut[usize::from(*c)];
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/outline.rs"]
mod tests;
