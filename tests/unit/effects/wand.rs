use proptest::prelude::*;

use super::*;

const RED: Rgba8 = [255, 0, 0, 255];
const BLUE: Rgba8 = [0, 0, 255, 255];

fn tol(v: f64) -> Tolerance {
    Tolerance::new(v).unwrap()
}

fn erased_mask(img: &RasterImage) -> Vec<bool> {
    img.pixels().map(|p| p[3] == 0).collect()
}

#[test]
fn red_field_with_one_blue_pixel() {
    let mut img = RasterImage::filled(10, 10, RED).unwrap();
    img.set_pixel(7, 2, BLUE).unwrap();

    let report =
        remove_background(&mut img, SeedPoint::new(0, 0), tol(10.0), EraseMode::Global).unwrap();

    assert_eq!(report.target_rgb, [255, 0, 0]);
    assert_eq!(report.erased, 99);
    assert_eq!(img.transparent_count(), 99);
    assert_eq!(img.pixel(7, 2), Some(BLUE));
    // RGB of erased pixels is preserved, only alpha changes.
    assert_eq!(img.pixel(0, 0), Some([255, 0, 0, 0]));
}

fn two_red_blocks() -> RasterImage {
    let mut img = RasterImage::filled(10, 10, BLUE).unwrap();
    for (ox, oy) in [(1u32, 1u32), (6, 6)] {
        for dy in 0..2 {
            for dx in 0..2 {
                img.set_pixel(ox + dx, oy + dy, RED).unwrap();
            }
        }
    }
    img
}

#[test]
fn global_threshold_erases_disjoint_regions_from_one_seed() {
    let mut img = two_red_blocks();
    let report =
        remove_background(&mut img, SeedPoint::new(1, 1), tol(50.0), EraseMode::Global).unwrap();

    assert_eq!(report.erased, 8);
    for (x, y) in [(1, 1), (2, 2), (6, 6), (7, 7)] {
        assert_eq!(img.pixel(x, y).unwrap()[3], 0, "({x}, {y}) should be erased");
    }
    assert_eq!(img.pixel(0, 0), Some(BLUE));
}

#[test]
fn connected_mode_only_erases_the_touched_block() {
    let mut img = two_red_blocks();
    let report = remove_background(
        &mut img,
        SeedPoint::new(1, 1),
        tol(50.0),
        EraseMode::Connected,
    )
    .unwrap();

    assert_eq!(report.erased, 4);
    assert_eq!(img.pixel(2, 2).unwrap()[3], 0);
    assert_eq!(img.pixel(6, 6), Some(RED));
}

#[test]
fn zero_tolerance_erases_exact_matches_only() {
    let mut img = RasterImage::filled(3, 1, [10, 10, 10, 255]).unwrap();
    img.set_pixel(1, 0, [10, 10, 11, 255]).unwrap();

    remove_background(&mut img, SeedPoint::new(0, 0), tol(0.0), EraseMode::Global).unwrap();

    assert_eq!(img.pixel(0, 0).unwrap()[3], 0);
    assert_eq!(img.pixel(1, 0).unwrap()[3], 255);
    assert_eq!(img.pixel(2, 0).unwrap()[3], 0);
}

#[test]
fn max_tolerance_erases_everything() {
    let mut img = RasterImage::filled(2, 1, [0, 0, 0, 255]).unwrap();
    img.set_pixel(1, 0, [255, 255, 255, 255]).unwrap();

    remove_background(&mut img, SeedPoint::new(0, 0), tol(441.68), EraseMode::Global).unwrap();
    assert_eq!(img.transparent_count(), 2);
}

#[test]
fn seed_out_of_bounds_leaves_buffer_unchanged() {
    let mut img = RasterImage::filled(4, 4, RED).unwrap();
    let before = img.clone();

    let err = remove_background(&mut img, SeedPoint::new(4, 0), tol(10.0), EraseMode::Global)
        .unwrap_err();

    assert!(matches!(
        err,
        ForgeError::OutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 4
        }
    ));
    assert_eq!(img, before);
}

#[test]
fn empty_buffer_is_noop() {
    let mut img = RasterImage::empty();
    let report =
        remove_background(&mut img, SeedPoint::new(3, 3), tol(10.0), EraseMode::Global).unwrap();
    assert_eq!(report.erased, 0);
    assert!(img.is_empty());
}

#[test]
fn repeated_erase_is_additive() {
    let mut img = RasterImage::filled(4, 1, RED).unwrap();
    img.set_pixel(3, 0, BLUE).unwrap();

    remove_background(&mut img, SeedPoint::new(0, 0), tol(5.0), EraseMode::Global).unwrap();
    assert_eq!(img.transparent_count(), 3);

    // Seeding an already-erased pixel compares on RGB only, so red is hit again but
    // nothing is restored.
    let second =
        remove_background(&mut img, SeedPoint::new(1, 0), tol(5.0), EraseMode::Global).unwrap();
    assert_eq!(second.erased, 0);
    assert_eq!(second.already_transparent, 3);

    remove_background(&mut img, SeedPoint::new(3, 0), tol(5.0), EraseMode::Global).unwrap();
    assert_eq!(img.transparent_count(), 4);
}

fn arb_image() -> impl Strategy<Value = RasterImage> {
    (1u32..6, 1u32..6).prop_flat_map(|(w, h)| {
        // A small palette so exact matches actually occur.
        let px = prop::sample::select(vec![0u8, 40, 128, 200, 255]);
        prop::collection::vec(px, (w * h * 4) as usize)
            .prop_map(move |data| RasterImage::from_rgba8(w, h, data).unwrap())
    })
}

proptest! {
    #[test]
    fn erased_set_grows_with_tolerance(
        img in arb_image(),
        sx in 0u32..6,
        sy in 0u32..6,
        t1 in 0.0f64..300.0,
        dt in 0.0f64..200.0,
    ) {
        let seed = SeedPoint::new(sx % img.width(), sy % img.height());

        let mut low = img.clone();
        remove_background(&mut low, seed, tol(t1), EraseMode::Global).unwrap();
        let mut high = img.clone();
        remove_background(&mut high, seed, tol(t1 + dt), EraseMode::Global).unwrap();

        for (a, b) in erased_mask(&low).iter().zip(erased_mask(&high)) {
            prop_assert!(!*a || b);
        }
    }

    #[test]
    fn zero_tolerance_matches_exact_rgb(img in arb_image(), sx in 0u32..6, sy in 0u32..6) {
        let seed = SeedPoint::new(sx % img.width(), sy % img.height());
        let target = img.pixel(seed.x, seed.y).unwrap();

        let mut out = img.clone();
        remove_background(&mut out, seed, tol(0.0), EraseMode::Global).unwrap();

        for (before, after) in img.pixels().zip(out.pixels()) {
            let same_rgb = before[..3] == target[..3];
            if same_rgb {
                prop_assert_eq!(after[3], 0);
            } else {
                prop_assert_eq!(after, before);
            }
        }
    }

    #[test]
    fn tolerance_past_max_distance_clears_all(img in arb_image(), sx in 0u32..6, sy in 0u32..6) {
        let seed = SeedPoint::new(sx % img.width(), sy % img.height());
        let mut out = img.clone();
        remove_background(&mut out, seed, tol(441.68), EraseMode::Global).unwrap();
        prop_assert_eq!(out.transparent_count(), out.pixel_count());
    }
}
