use super::*;

#[test]
fn index_follows_row_major_layout() {
    let img = RasterImage::new(5, 3).unwrap();
    assert_eq!(img.index(0, 0), 0);
    assert_eq!(img.index(4, 0), 16);
    assert_eq!(img.index(0, 1), 20);
    assert_eq!(img.index(2, 2), (2 * 5 + 2) * 4);
}

#[test]
fn from_rgba8_checks_length() {
    assert!(RasterImage::from_rgba8(2, 2, vec![0; 15]).is_err());
    let img = RasterImage::from_rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
    assert_eq!(img.pixel(2, 0), None);
}

#[test]
fn set_pixel_out_of_bounds_is_rejected() {
    let mut img = RasterImage::filled(2, 2, [9, 9, 9, 255]).unwrap();
    let before = img.clone();
    let err = img.set_pixel(2, 0, [0, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, ForgeError::OutOfBounds { x: 2, y: 0, .. }));
    assert_eq!(img, before);
}

#[test]
fn empty_has_no_pixels() {
    let img = RasterImage::empty();
    assert!(img.is_empty());
    assert_eq!(img.pixel_count(), 0);
    assert!(RasterImage::new(0, 7).unwrap().is_empty());
}

#[test]
fn transparent_count_and_image_roundtrip() {
    let mut img = RasterImage::filled(3, 1, [1, 2, 3, 255]).unwrap();
    img.set_pixel(1, 0, [1, 2, 3, 0]).unwrap();
    assert_eq!(img.transparent_count(), 1);

    let back = RasterImage::from_rgba_image(img.to_rgba_image().unwrap());
    assert_eq!(back, img);
}
