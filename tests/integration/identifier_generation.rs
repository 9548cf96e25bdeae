//! Integration tests for QR identifier generation.

use std::fs;

use am::error::AmError;
use am::identifier::{BORDER_MODULES, IdentifierGenerator, MODULE_PIXELS, payload_for};
use image::GenericImageView;

use crate::common::fixtures::TestWorkspace;
use crate::common::qr::decode;

#[test]
fn test_generated_image_decodes_to_payload() {
    let ws = TestWorkspace::new();
    let db = ws.open();

    let path = db.generate_identifier(7).unwrap();
    assert_eq!(path, ws.qr_dir().join("appliance_7.png"));
    assert_eq!(decode(&path), "appliance/7");
}

#[test]
fn test_regeneration_overwrites_same_path() {
    let ws = TestWorkspace::new();
    let db = ws.open();

    let first = db.generate_identifier(7).unwrap();
    let first_bytes = fs::read(&first).unwrap();
    let second = db.generate_identifier(7).unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), first_bytes);
    assert_eq!(decode(&second), "appliance/7");
    assert_eq!(fs::read_dir(ws.qr_dir()).unwrap().count(), 1);
}

#[test]
fn test_generation_does_not_require_appliance() {
    // Identifier generation is a pure id -> image transform.
    let ws = TestWorkspace::new();
    let db = ws.open();
    assert!(db.get_appliance(4242).unwrap().is_none());
    let path = db.generate_identifier(4242).unwrap();
    assert_eq!(decode(&path), payload_for(4242));
}

#[test]
fn test_image_is_black_on_white_with_border() {
    let ws = TestWorkspace::new();
    let path = IdentifierGenerator::new(ws.qr_dir()).generate(1).unwrap();

    let img = image::open(&path).unwrap();
    let (w, h) = img.dimensions();
    assert_eq!(w, h);
    assert_eq!(w % MODULE_PIXELS, 0);

    let luma = img.to_luma8();
    assert!(luma.pixels().all(|p| p[0] == 0 || p[0] == 255));

    let margin = BORDER_MODULES * MODULE_PIXELS;
    for x in 0..w {
        assert_eq!(luma.get_pixel(x, margin - 1)[0], 255);
        assert_eq!(luma.get_pixel(x, h - margin)[0], 255);
    }
}

#[test]
fn test_unwritable_output_dir_is_storage_error() {
    let ws = TestWorkspace::new();
    let blocker = ws.path().join("not_a_dir");
    fs::write(&blocker, b"x").unwrap();

    let result = IdentifierGenerator::new(blocker.join("qr")).generate(3);
    assert!(matches!(result, Err(AmError::StorageUnavailable { .. })));
}

#[test]
fn test_distinct_ids_get_distinct_files() {
    let ws = TestWorkspace::new();
    let generator = IdentifierGenerator::new(ws.qr_dir());
    for id in [1, 2, 100] {
        let path = generator.generate(id).unwrap();
        assert_eq!(decode(&path), format!("appliance/{id}"));
    }
    assert_eq!(fs::read_dir(ws.qr_dir()).unwrap().count(), 3);
}
