use crate::foundation::error::{ForgeError, ForgeResult};

/// Straight (non-premultiplied) RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Largest Euclidean distance between two 8-bit RGB triples, `255 * sqrt(3)`.
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// Euclidean distance between the RGB parts of two pixels. Alpha is ignored.
pub fn rgb_distance(a: Rgba8, b: Rgba8) -> f64 {
    let dr = i32::from(a[0]) - i32::from(b[0]);
    let dg = i32::from(a[1]) - i32::from(b[1]);
    let db = i32::from(a[2]) - i32::from(b[2]);
    f64::from(dr * dr + dg * dg + db * db).sqrt()
}

/// Pixel position used to pick the erase target color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SeedPoint {
    pub x: u32,
    pub y: u32,
}

impl SeedPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Map a position inside a scaled view of the image to a pixel, clamped into bounds.
    ///
    /// `view_w`/`view_h` are the displayed size, `image_w`/`image_h` the buffer size.
    /// Positions left of or above the view clamp to the first row/column.
    pub fn from_view(
        view_x: f64,
        view_y: f64,
        view_w: f64,
        view_h: f64,
        image_w: u32,
        image_h: u32,
    ) -> ForgeResult<Self> {
        if image_w == 0 || image_h == 0 {
            return Err(ForgeError::empty_buffer("cannot map a seed into an empty image"));
        }
        if !(view_w.is_finite() && view_h.is_finite()) || view_w <= 0.0 || view_h <= 0.0 {
            return Err(ForgeError::validation("view size must be finite and > 0"));
        }
        if !(view_x.is_finite() && view_y.is_finite()) {
            return Err(ForgeError::validation("view position must be finite"));
        }

        let map = |pos: f64, view: f64, size: u32| -> u32 {
            let scaled = (pos * f64::from(size) / view).floor();
            scaled.clamp(0.0, f64::from(size - 1)) as u32
        };
        Ok(Self {
            x: map(view_x, view_w, image_w),
            y: map(view_y, view_h, image_h),
        })
    }
}

/// Color-distance threshold for the magic-wand erase. Always finite and `>= 0`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize)]
pub struct Tolerance(f64);

impl Tolerance {
    pub fn new(value: f64) -> ForgeResult<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(ForgeError::validation("tolerance must be finite and >= 0"));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    /// Whether a pixel at `distance` from the target color should be erased.
    ///
    /// Erases when `distance < tolerance`. An exact color match is always erased,
    /// which makes a zero tolerance select exactly the seed color.
    pub fn admits(self, distance: f64) -> bool {
        distance == 0.0 || distance < self.0
    }
}

impl<'de> serde::Deserialize<'de> for Tolerance {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        Tolerance::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
