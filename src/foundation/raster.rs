use crate::foundation::{
    core::Rgba8,
    error::{ForgeError, ForgeResult},
};

/// Owned straight-alpha RGBA8 pixel grid, row-major and tightly packed.
///
/// Channel `c` of pixel `(x, y)` lives at `(y * width + x) * 4 + c`.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl RasterImage {
    /// Zero-sized image; the output of no-op operations on empty input.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Transparent black image of the given size.
    pub fn new(width: u32, height: u32) -> ForgeResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, px: Rgba8) -> ForgeResult<Self> {
        let len = byte_len(width, height)?;
        let data = px.repeat(len / 4);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap raw straight RGBA8 bytes. Length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> ForgeResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(ForgeError::validation(format!(
                "rgba8 buffer length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// Byte offset of pixel `(x, y)`. Caller guarantees bounds.
    pub fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if !self.contains(x, y) {
            return None;
        }
        let i = self.index(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) -> ForgeResult<()> {
        if !self.contains(x, y) {
            return Err(ForgeError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.index(x, y);
        self.data[i..i + 4].copy_from_slice(&px);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn pixels(&self) -> impl Iterator<Item = Rgba8> + '_ {
        self.data.chunks_exact(4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Number of pixels whose alpha is zero.
    pub fn transparent_count(&self) -> usize {
        self.data.chunks_exact(4).filter(|p| p[3] == 0).count()
    }

    pub fn to_rgba_image(&self) -> ForgeResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| ForgeError::validation("raster does not fit an image buffer"))
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

fn byte_len(width: u32, height: u32) -> ForgeResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| ForgeError::validation("raster buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/raster.rs"]
mod tests;
