//! QR decoding helpers.

use std::path::Path;

/// Decodes the single QR symbol in the image at `path`.
///
/// # Panics
///
/// Panics if the file cannot be read or does not contain exactly one
/// decodable symbol.
pub fn decode(path: &Path) -> String {
    let img = image::open(path)
        .unwrap_or_else(|e| panic!("Failed to open {}: {e}", path.display()))
        .to_luma8();
    let (w, h) = img.dimensions();

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(w as usize, h as usize, |x, y| {
        img.get_pixel(x as u32, y as u32)[0]
    });
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected one QR symbol in {}", path.display());

    let (_meta, content) = grids[0]
        .decode()
        .unwrap_or_else(|e| panic!("Failed to decode {}: {e:?}", path.display()));
    content
}
