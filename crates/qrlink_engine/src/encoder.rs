use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{Color, QrCode};
use thiserror::Error;

use crate::{EncodedQr, RenderOptions};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("qr encode error: {0}")]
    Qr(#[from] QrError),
    #[error("png encode error: {0}")]
    Png(#[from] image::ImageError),
    #[error("qr image too large ({modules} modules, margin {margin}, width {width})")]
    TooLarge { modules: u32, margin: u32, width: u32 },
}

/// Largest side, in pixels, the encoder will allocate.
pub const MAX_SIDE: u32 = 8192;

pub trait QrEncoder: Send + Sync {
    fn encode(&self, payload: &str, options: &RenderOptions) -> Result<EncodedQr, EncodeError>;
}

/// Encodes the payload bytes unmodified with the `qrcode` crate and rasterizes
/// the symbol into a square RGBA PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngQrEncoder;

impl QrEncoder for PngQrEncoder {
    fn encode(&self, payload: &str, options: &RenderOptions) -> Result<EncodedQr, EncodeError> {
        let code = QrCode::new(payload.as_bytes())?;
        let modules = code.width() as u32;
        let image = rasterize(&code.to_colors(), modules, options)?;

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        Ok(EncodedQr {
            png,
            width: image.width(),
            height: image.height(),
            modules,
        })
    }
}

/// Stretches `modules + 2 * margin` cells over `options.width` pixels, or one
/// pixel per cell when the target is too small to fit them.
fn rasterize(
    colors: &[Color],
    modules: u32,
    options: &RenderOptions,
) -> Result<RgbaImage, EncodeError> {
    let too_large = || EncodeError::TooLarge {
        modules,
        margin: options.margin,
        width: options.width,
    };
    let cells = options
        .margin
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(modules))
        .ok_or_else(too_large)?;
    let side = options.width.max(cells);
    if side > MAX_SIDE {
        return Err(too_large());
    }
    let dark = Rgba(options.dark.rgba());
    let light = Rgba(options.light.rgba());

    // Both factors are at most MAX_SIDE, so the product fits in u64.
    let module_at = |pixel: u32| -> Option<u32> {
        let cell = (u64::from(pixel) * u64::from(cells) / u64::from(side)) as u32;
        cell.checked_sub(options.margin).filter(|m| *m < modules)
    };

    Ok(RgbaImage::from_fn(side, side, |x, y| {
        match (module_at(x), module_at(y)) {
            (Some(mx), Some(my)) if colors[(my * modules + mx) as usize] == Color::Dark => dark,
            _ => light,
        }
    }))
}
