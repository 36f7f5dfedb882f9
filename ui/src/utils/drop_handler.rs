//! Drag-and-drop of logo files.
//!
//! The `DropHandler` trait abstracts egui's dropped-file events so tests can
//! inject files without a window system.
//!
//! Only files whose MIME type starts with `image/` are accepted. The MIME type
//! reported by the platform wins; when it is missing (most native backends)
//! it is guessed from the file name. Anything else is ignored without
//! feedback, matching what users expect from a drop zone.

use qrstudio_business::LogoSource;

pub trait DropHandler {
    /// Returns the first acceptable logo dropped this frame.
    fn handle_drop(&self, ctx: &egui::Context) -> Option<LogoSource>;
}

/// Reads drops from egui's raw input.
#[derive(Debug, Default)]
pub struct SystemDropHandler;

impl DropHandler for SystemDropHandler {
    fn handle_drop(&self, ctx: &egui::Context) -> Option<LogoSource> {
        handle_dropped_files(ctx)
    }
}

pub fn handle_dropped_files(ctx: &egui::Context) -> Option<LogoSource> {
    let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
    if dropped_files.is_empty() {
        return None;
    }

    log::trace!(
        target: "qrstudio::drop",
        "dropped_files={}",
        dropped_files.len()
    );
    dropped_files.iter().find_map(logo_from_dropped_file)
}

/// Turns a dropped file into a logo, or `None` when it is not an image.
pub fn logo_from_dropped_file(file: &egui::DroppedFile) -> Option<LogoSource> {
    let name = dropped_file_name(file);
    let mime = if file.mime.is_empty() {
        mime_from_name(&name)
    } else {
        file.mime.clone()
    };

    if !mime.starts_with("image/") {
        log::debug!(
            target: "qrstudio::drop",
            "ignoring non-image drop name={name} mime={mime}"
        );
        return None;
    }

    let result = if let Some(bytes) = &file.bytes {
        LogoSource::new(name, mime, bytes.clone())
    } else {
        read_dropped_path(file, name, mime)?
    };

    match result {
        Ok(logo) => {
            log::info!(
                target: "qrstudio::drop",
                "logo dropped name={} mime={} bytes={}",
                logo.name(),
                logo.mime(),
                logo.len()
            );
            Some(logo)
        }
        Err(err) => {
            log::warn!(target: "qrstudio::drop", "dropped file rejected: {err}");
            None
        }
    }
}

fn dropped_file_name(file: &egui::DroppedFile) -> String {
    if !file.name.is_empty() {
        return file.name.clone();
    }
    file.path
        .as_deref()
        .and_then(std::path::Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn mime_from_name(name: &str) -> String {
    mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_owned())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn read_dropped_path(
    file: &egui::DroppedFile,
    name: String,
    mime: String,
) -> Option<Result<LogoSource, qrstudio_business::LogoError>> {
    let Some(path) = &file.path else {
        log::warn!(
            target: "qrstudio::drop",
            "dropped_file_missing_path_and_bytes name={name}"
        );
        return None;
    };
    Some(
        std::fs::read(path)
            .map_err(qrstudio_business::LogoError::from)
            .and_then(|bytes| LogoSource::new(name, mime, bytes)),
    )
}

#[cfg(target_arch = "wasm32")]
fn read_dropped_path(
    _file: &egui::DroppedFile,
    name: String,
    _mime: String,
) -> Option<Result<LogoSource, qrstudio_business::LogoError>> {
    log::warn!(
        target: "qrstudio::drop",
        "browser drop without contents name={name}"
    );
    None
}
