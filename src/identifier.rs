//! QR identifier images for appliances.
//!
//! Each appliance id maps to one PNG under the output directory:
//!
//! ```text
//! <output_dir>/
//! ├── appliance_1.png    # encodes "appliance/1"
//! └── appliance_7.png    # encodes "appliance/7"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::{debug, info, instrument, trace};

use crate::error::{AmError, Result};

/// Pixels per QR module.
pub const MODULE_PIXELS: u32 = 10;

/// Width of the white quiet zone, in modules.
pub const BORDER_MODULES: u32 = 5;

/// Error-correction level used for every identifier.
pub const EC_LEVEL: EcLevel = EcLevel::M;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Renders appliance identifiers into an output directory.
#[derive(Debug, Clone)]
pub struct IdentifierGenerator {
    output_dir: PathBuf,
}

impl IdentifierGenerator {
    /// Creates a generator writing under `output_dir`.
    ///
    /// The directory is created lazily on the first [`generate`](Self::generate).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory identifier images are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the image for `appliance_id` is written to.
    pub fn path_for(&self, appliance_id: i64) -> PathBuf {
        self.output_dir.join(format!("appliance_{appliance_id}.png"))
    }

    /// Encodes the identifier for `appliance_id` and writes it to disk.
    ///
    /// Regenerating for the same id replaces the previous image. The image is
    /// written to a sibling temporary file first and renamed into place.
    #[instrument(skip(self), fields(dir = %self.output_dir.display()))]
    pub fn generate(&self, appliance_id: i64) -> Result<PathBuf> {
        if appliance_id < 1 {
            return Err(AmError::invalid(
                "appliance id",
                format!("{appliance_id} is not a positive id"),
            ));
        }

        let payload = payload_for(appliance_id);
        let image = render(&payload)?;

        fs::create_dir_all(&self.output_dir).map_err(|e| {
            AmError::storage(
                "generate_identifier",
                format!("failed to create {}: {e}", self.output_dir.display()),
            )
        })?;

        let path = self.path_for(appliance_id);
        let staging = path.with_extension("png.tmp");
        trace!(staging = %staging.display(), "Writing staged identifier image");

        if let Err(e) = image.save_with_format(&staging, ImageFormat::Png) {
            let _ = fs::remove_file(&staging);
            return Err(AmError::storage(
                "generate_identifier",
                format!("failed to write {}: {e}", staging.display()),
            ));
        }

        fs::rename(&staging, &path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            AmError::storage(
                "generate_identifier",
                format!("failed to move image into {}: {e}", path.display()),
            )
        })?;

        info!(appliance_id, path = %path.display(), "Identifier written");
        Ok(path)
    }
}

/// Text encoded into the identifier for `appliance_id`.
pub fn payload_for(appliance_id: i64) -> String {
    format!("appliance/{appliance_id}")
}

/// Renders `payload` as a black-on-white QR raster.
pub fn render(payload: &str) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EC_LEVEL)
        .map_err(|e| AmError::storage("generate_identifier", format!("QR encoding failed: {e}")))?;

    let modules = u32::try_from(code.width())
        .map_err(|_| AmError::storage("generate_identifier", "QR symbol too large"))?;
    let side = (modules + 2 * BORDER_MODULES) * MODULE_PIXELS;
    debug!(modules, side, "Rendering QR symbol");

    let image = GrayImage::from_fn(side, side, |x, y| {
        let mx = x / MODULE_PIXELS;
        let my = y / MODULE_PIXELS;
        let inside = (BORDER_MODULES..BORDER_MODULES + modules).contains(&mx)
            && (BORDER_MODULES..BORDER_MODULES + modules).contains(&my);
        if !inside {
            return LIGHT;
        }
        let cell = ((mx - BORDER_MODULES) as usize, (my - BORDER_MODULES) as usize);
        match code[cell] {
            Color::Dark => DARK,
            Color::Light => LIGHT,
        }
    });

    Ok(image)
}
