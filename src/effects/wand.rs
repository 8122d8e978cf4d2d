//! Magic-wand background removal by RGB color-distance thresholding.
//!
//! The default [`EraseMode::Global`] compares every pixel in the buffer against
//! the seed color, so color-similar regions anywhere in the image are erased
//! together, not only the region touching the seed. [`EraseMode::Connected`]
//! restricts the erase to the 4-connected region around the seed and is only
//! used when asked for.

use std::collections::VecDeque;

use crate::foundation::{
    core::{Rgba8, SeedPoint, Tolerance, rgb_distance},
    error::{ForgeError, ForgeResult},
    raster::RasterImage,
};

/// Which pixels are candidates for erasing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraseMode {
    /// Every pixel in the buffer within tolerance of the seed color.
    #[default]
    Global,
    /// Only pixels within tolerance that are 4-connected to the seed.
    Connected,
}

/// Outcome of one erase pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EraseReport {
    /// RGB of the seed pixel at the time of the call.
    pub target_rgb: [u8; 3],
    /// Pixels that went from visible to fully transparent in this pass.
    pub erased: usize,
    /// Pixels within tolerance that were already fully transparent.
    pub already_transparent: usize,
}

impl EraseReport {
    fn noop() -> Self {
        Self {
            target_rgb: [0, 0, 0],
            erased: 0,
            already_transparent: 0,
        }
    }
}

/// Make every pixel within `tolerance` of the seed's RGB fully transparent.
///
/// Only alpha is written; RGB of erased pixels is left as is, and alpha is
/// never raised, so repeated calls only ever add transparency. An empty buffer
/// is a no-op. A seed outside the buffer is rejected with
/// [`ForgeError::OutOfBounds`] and the buffer is left unchanged.
#[tracing::instrument(skip(buffer), fields(width = buffer.width(), height = buffer.height()))]
pub fn remove_background(
    buffer: &mut RasterImage,
    seed: SeedPoint,
    tolerance: Tolerance,
    mode: EraseMode,
) -> ForgeResult<EraseReport> {
    if buffer.is_empty() {
        tracing::debug!("remove_background on empty buffer is a no-op");
        return Ok(EraseReport::noop());
    }
    let target = buffer.pixel(seed.x, seed.y).ok_or(ForgeError::OutOfBounds {
        x: seed.x,
        y: seed.y,
        width: buffer.width(),
        height: buffer.height(),
    })?;

    let report = match mode {
        EraseMode::Global => erase_global(buffer, target, tolerance),
        EraseMode::Connected => erase_connected(buffer, seed, target, tolerance),
    };
    tracing::debug!(
        erased = report.erased,
        already_transparent = report.already_transparent,
        "erase pass done"
    );
    Ok(report)
}

fn erase_global(buffer: &mut RasterImage, target: Rgba8, tolerance: Tolerance) -> EraseReport {
    let mut report = EraseReport {
        target_rgb: [target[0], target[1], target[2]],
        ..EraseReport::noop()
    };
    for px in buffer.as_bytes_mut().chunks_exact_mut(4) {
        let d = rgb_distance([px[0], px[1], px[2], px[3]], target);
        if tolerance.admits(d) {
            erase_px(px, &mut report);
        }
    }
    report
}

fn erase_connected(
    buffer: &mut RasterImage,
    seed: SeedPoint,
    target: Rgba8,
    tolerance: Tolerance,
) -> EraseReport {
    let mut report = EraseReport {
        target_rgb: [target[0], target[1], target[2]],
        ..EraseReport::noop()
    };
    let (w, h) = (buffer.width(), buffer.height());
    let mut visited = vec![false; buffer.pixel_count()];
    let mut queue = VecDeque::new();

    visited[(seed.y as usize) * (w as usize) + seed.x as usize] = true;
    queue.push_back((seed.x, seed.y));

    while let Some((x, y)) = queue.pop_front() {
        let i = buffer.index(x, y);
        let px = &mut buffer.as_bytes_mut()[i..i + 4];
        if !tolerance.admits(rgb_distance([px[0], px[1], px[2], px[3]], target)) {
            continue;
        }
        erase_px(px, &mut report);

        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1).filter(|&nx| nx < w), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1).filter(|&ny| ny < h)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let vi = (ny as usize) * (w as usize) + nx as usize;
            if !visited[vi] {
                visited[vi] = true;
                queue.push_back((nx, ny));
            }
        }
    }
    report
}

fn erase_px(px: &mut [u8], report: &mut EraseReport) {
    if px[3] == 0 {
        report.already_transparent += 1;
    } else {
        px[3] = 0;
        report.erased += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/wand.rs"]
mod tests;
