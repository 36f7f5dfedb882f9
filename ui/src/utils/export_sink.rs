//! Where exported PNGs go.
//!
//! - **Native**: a save dialog pre-filled with `qrcode.png`.
//! - **Web**: a Blob download through a temporary anchor; the object URL is
//!   revoked once the click was dispatched.

use qrstudio_business::{ExportError, PngExport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(String),
    Cancelled,
}

pub trait ExportSink {
    fn save(&mut self, export: PngExport) -> Result<SaveOutcome, ExportError>;
}

#[derive(Debug, Default)]
pub struct SystemExportSink;

#[cfg(not(target_arch = "wasm32"))]
impl ExportSink for SystemExportSink {
    fn save(&mut self, export: PngExport) -> Result<SaveOutcome, ExportError> {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG image", &["png"])
            .set_file_name(&export.file_name)
            .set_title("Save QR code")
            .save_file()
        else {
            log::debug!(target: "qrstudio::export", "save dialog dismissed");
            return Ok(SaveOutcome::Cancelled);
        };

        export.write_to(&path)?;
        Ok(SaveOutcome::Saved(path.display().to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ExportSink for SystemExportSink {
    fn save(&mut self, export: PngExport) -> Result<SaveOutcome, ExportError> {
        use eframe::wasm_bindgen::JsCast as _;
        use web_sys::js_sys::{Array, Uint8Array};

        let window = web_sys::window().ok_or_else(|| platform_error("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| platform_error("no document"))?;

        let parts = Array::new();
        parts.push(&Uint8Array::from(export.bytes.as_slice()));
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("image/png");
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_error)?;

        let url = ObjectUrl::new(&blob)?;
        let anchor = document
            .create_element("a")
            .map_err(js_error)?
            .dyn_into::<web_sys::HtmlAnchorElement>()
            .map_err(|element| platform_error(&format!("{element:?} is not an anchor")))?;
        anchor.set_href(url.as_str());
        anchor.set_download(&export.file_name);
        anchor.click();

        log::info!(
            target: "qrstudio::export",
            "download of {} ({} bytes) started",
            export.file_name,
            export.bytes.len()
        );
        Ok(SaveOutcome::Saved(export.file_name))
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_error(msg: &str) -> ExportError {
    ExportError::Platform(msg.to_owned())
}

#[cfg(target_arch = "wasm32")]
fn js_error(err: wasm_bindgen::JsValue) -> ExportError {
    ExportError::Platform(format!("{err:?}"))
}

/// Object URL revoked on drop.
#[cfg(target_arch = "wasm32")]
struct ObjectUrl(String);

#[cfg(target_arch = "wasm32")]
impl ObjectUrl {
    fn new(blob: &web_sys::Blob) -> Result<Self, ExportError> {
        web_sys::Url::create_object_url_with_blob(blob)
            .map(Self)
            .map_err(js_error)
    }

    fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for ObjectUrl {
    fn drop(&mut self) {
        if let Err(err) = web_sys::Url::revoke_object_url(&self.0) {
            log::warn!(target: "qrstudio::export", "failed to revoke object url: {err:?}");
        }
    }
}
