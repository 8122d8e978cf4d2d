use super::*;
use crate::{ForgeError, assets::codec::encode_png};

fn img(px: [u8; 4]) -> RasterImage {
    RasterImage::filled(2, 2, px).unwrap()
}

#[test]
fn current_ticket_applies() {
    let mut slot = ImageSlot::new();
    let t = slot.begin_load();
    assert!(matches!(slot.complete(t, Ok(img([1, 1, 1, 255]))), SlotUpdate::Applied));
    assert_eq!(slot.image(), Some(&img([1, 1, 1, 255])));
    // A ticket is single-use.
    assert!(!slot.is_current(t));
}

#[test]
fn newer_load_supersedes_older() {
    let mut slot = ImageSlot::new();
    let first = slot.begin_load();
    let second = slot.begin_load();

    assert!(matches!(slot.complete(second, Ok(img([2, 2, 2, 255]))), SlotUpdate::Applied));
    assert!(matches!(slot.complete(first, Ok(img([1, 1, 1, 255]))), SlotUpdate::Stale));
    assert_eq!(slot.image(), Some(&img([2, 2, 2, 255])));
}

#[test]
fn close_discards_late_results() {
    let mut slot = ImageSlot::new();
    slot.set(img([5, 5, 5, 255]));
    let t = slot.begin_load();
    slot.close();

    assert!(matches!(slot.complete(t, Ok(img([1, 1, 1, 255]))), SlotUpdate::Stale));
    assert!(slot.image().is_none());
}

#[test]
fn failed_decode_keeps_previous_image() {
    let mut slot = ImageSlot::new();
    slot.set(img([5, 5, 5, 255]));

    match slot.load_bytes(b"nope") {
        SlotUpdate::Failed(ForgeError::Decode(_)) => {}
        other => panic!("expected decode failure, got {other:?}"),
    }
    assert_eq!(slot.image(), Some(&img([5, 5, 5, 255])));
}

#[test]
fn load_bytes_decodes_png() {
    let mut slot = ImageSlot::new();
    let png = encode_png(&img([9, 8, 7, 255])).unwrap();
    assert!(matches!(slot.load_bytes(&png), SlotUpdate::Applied));
    assert_eq!(slot.image(), Some(&img([9, 8, 7, 255])));
}
