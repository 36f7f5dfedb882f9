use qrstudio_states::StateCtx;

use crate::controller::{generation_status, render_output};
use crate::error::ExportError;
use crate::surface::RenderedSurface;

pub const EXPORT_FILE_NAME: &str = "qrcode.png";

/// PNG bytes ready to be handed to a save dialog or a browser download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl PngExport {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn write_to(&self, path: &std::path::Path) -> Result<(), ExportError> {
        std::fs::write(path, &self.bytes)?;
        log::info!(
            target: "qrstudio::export",
            "wrote {} bytes to {}",
            self.bytes.len(),
            path.display()
        );
        Ok(())
    }
}

/// Encodes the finished render, refusing while the status is not ready.
pub fn export_png(ctx: &StateCtx) -> Result<PngExport, ExportError> {
    if !generation_status(ctx).ready {
        return Err(ExportError::NotReady);
    }
    let surface = render_output(ctx)
        .and_then(|output| output.surface.as_deref())
        .ok_or(ExportError::NotReady)?;
    encode_png(surface)
}

pub fn encode_png(surface: &RenderedSurface) -> Result<PngExport, ExportError> {
    let bytes = surface.to_png()?;
    log::debug!(
        target: "qrstudio::export",
        "encoded {}px surface into {} PNG bytes",
        surface.dimension(),
        bytes.len()
    );
    Ok(PngExport {
        file_name: EXPORT_FILE_NAME.to_owned(),
        bytes,
    })
}
