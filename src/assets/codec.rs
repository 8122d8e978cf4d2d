use std::{io::Cursor, path::Path};

use anyhow::Context;

use crate::foundation::{
    error::{ForgeError, ForgeResult},
    raster::RasterImage,
};

/// Decode PNG/JPEG/... bytes into a straight-alpha RGBA8 raster.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode_image(bytes: &[u8]) -> ForgeResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ForgeError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    tracing::debug!(width = rgba.width(), height = rgba.height(), "decoded image");
    Ok(RasterImage::from_rgba_image(rgba))
}

/// Read and decode an image file. Unreadable files are reported as decode failures.
pub fn load_image_file(path: &Path) -> ForgeResult<RasterImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| ForgeError::decode(format!("read image '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

/// Encode a raster as PNG bytes.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn encode_png(img: &RasterImage) -> ForgeResult<Vec<u8>> {
    if img.is_empty() {
        return Err(ForgeError::empty_buffer("cannot encode a zero-sized image"));
    }
    let rgba = img.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ForgeError::encode(format!("encode png: {e}")))?;
    Ok(buf)
}

/// Encode and write a PNG file, creating parent directories as needed.
pub fn save_png(img: &RasterImage, path: &Path) -> ForgeResult<()> {
    let png = encode_png(img)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
