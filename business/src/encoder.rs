//! Adapter over the `qrcode` crate: text in, pixels on a [`RenderedSurface`].

use image::Rgba;
use qrcode::types::{Color, Version};
use qrcode::{EcLevel, QrCode};

use crate::error::RenderError;
use crate::surface::RenderedSurface;

/// Highest tier, survives ~30% module loss under the logo.
pub const ERROR_CORRECTION: EcLevel = EcLevel::H;
pub const QUIET_ZONE_MODULES: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub ec_level: EcLevel,
    /// Quiet zone, in modules.
    pub margin: u32,
    /// Output side length, in pixels.
    pub width: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
}

/// Shape of the encoded symbol, without the quiet zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolInfo {
    pub version: i16,
    pub modules: u32,
}

/// Clears `surface` and draws the symbol for `text` into it.
///
/// The symbol and its quiet zone are stretched over the full `width`, each
/// pixel taking the color of the module it falls into.
pub fn encode_into(
    text: &str,
    options: &EncodeOptions,
    surface: &mut RenderedSurface,
) -> Result<SymbolInfo, RenderError> {
    surface.reset(options.width);

    let code = QrCode::with_error_correction_level(text.as_bytes(), options.ec_level)?;
    let modules = code.width();
    let colors = code.to_colors();

    let margin = options.margin as usize;
    let total = modules + 2 * margin;
    let required = u32::try_from(total).unwrap_or(u32::MAX);
    if options.width < required {
        return Err(RenderError::DimensionTooSmall {
            dimension: options.width,
            required,
        });
    }

    // pixel px falls into cell floor(px * total / width)
    let width = options.width as usize;
    let lookup: Vec<Option<usize>> = (0..width)
        .map(|px| {
            (px * total / width)
                .checked_sub(margin)
                .filter(|m| *m < modules)
        })
        .collect();

    for (y, row) in surface.image_mut().rows_mut().enumerate() {
        for (x, pixel) in row.enumerate() {
            let dark = match (lookup[x], lookup[y]) {
                (Some(mx), Some(my)) => colors[my * modules + mx] == Color::Dark,
                _ => false,
            };
            *pixel = if dark { options.dark } else { options.light };
        }
    }

    let version = match code.version() {
        Version::Normal(v) | Version::Micro(v) => v,
    };
    log::trace!(
        target: "qrstudio::render",
        "encoded {} bytes as version {version} ({modules} modules) at {}px",
        text.len(),
        options.width
    );

    Ok(SymbolInfo {
        version,
        modules: u32::try_from(modules).unwrap_or(u32::MAX),
    })
}
