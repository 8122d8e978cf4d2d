use crate::foundation::{
    core::Rgba8,
    error::{ForgeError, ForgeResult},
};

pub type PremulRgba8 = [u8; 4];

/// Source-over in premultiplied space, with an extra opacity multiplier on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Source-over for straight-alpha pixels.
///
/// A transparent `src` returns `dst` untouched and an opaque `src` replaces it,
/// so pixels outside the painted area never pick up rounding drift.
pub fn over_straight(dst: Rgba8, src: Rgba8) -> Rgba8 {
    match src[3] {
        0 => dst,
        255 => src,
        _ => unpremultiply(over(premultiply(dst), premultiply(src), 1.0)),
    }
}

/// Composite a premultiplied layer (e.g. a rendered pixmap) over straight-alpha bytes.
pub fn over_premul_layer_in_place(dst: &mut [u8], layer: &[u8]) -> ForgeResult<()> {
    if dst.len() != layer.len() || !dst.len().is_multiple_of(4) {
        return Err(ForgeError::validation(
            "over_premul_layer_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        let straight_dst = [d[0], d[1], d[2], d[3]];
        let out = unpremultiply(over(
            premultiply(straight_dst),
            [s[0], s[1], s[2], s[3]],
            1.0,
        ));
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn premultiply(px: Rgba8) -> PremulRgba8 {
    let a = u16::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn unpremultiply(px: PremulRgba8) -> Rgba8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    if a == 255 {
        return px;
    }
    let un = |c: u8| -> u8 { ((u32::from(c) * 255 + a / 2) / a).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), px[3]]
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
