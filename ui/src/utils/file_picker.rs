//! File picker for logo images.
//!
//! - **Native**: blocking `rfd::FileDialog`, the file is read from disk.
//! - **Web**: `rfd::AsyncFileDialog`; the picked file arrives on a later frame
//!   through a channel.
//!
//! The picker opens from the "Choose file…" button or Ctrl+O / Cmd+O.

use qrstudio_business::LogoSource;

pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "tiff", "tif",
];

pub trait FilePickerHandler {
    /// Opens the picker.
    fn request_pick(&mut self);

    /// The logo chosen since the last call, if any.
    fn take_picked(&mut self) -> Option<LogoSource>;

    /// Opens the picker on Ctrl+O / Cmd+O. Returns whether it did.
    fn handle_shortcut(&mut self, ctx: &egui::Context) -> bool {
        let pressed = ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::O));
        if pressed {
            log::debug!(target: "qrstudio::picker", "file picker shortcut detected");
            self.request_pick();
        }
        pressed
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct SystemFilePickerHandler {
    picked: Option<LogoSource>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FilePickerHandler for SystemFilePickerHandler {
    fn request_pick(&mut self) {
        if let Some(logo) = pick_logo_file() {
            self.picked = Some(logo);
        }
    }

    fn take_picked(&mut self) -> Option<LogoSource> {
        self.picked.take()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn pick_logo_file() -> Option<LogoSource> {
    let path = rfd::FileDialog::new()
        .add_filter("Image", IMAGE_EXTENSIONS)
        .set_title("Select a logo")
        .pick_file()?;

    log::info!(target: "qrstudio::picker", "user selected {}", path.display());
    load_logo_from_path(&path)
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_logo_from_path(path: &std::path::Path) -> Option<LogoSource> {
    match LogoSource::from_path(path) {
        Ok(logo) => Some(logo),
        Err(err) => {
            log::warn!(
                target: "qrstudio::picker",
                "cannot use {} as logo: {err}",
                path.display()
            );
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub struct SystemFilePickerHandler {
    send: flume::Sender<LogoSource>,
    recv: flume::Receiver<LogoSource>,
}

#[cfg(target_arch = "wasm32")]
impl Default for SystemFilePickerHandler {
    fn default() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }
}

#[cfg(target_arch = "wasm32")]
impl FilePickerHandler for SystemFilePickerHandler {
    fn request_pick(&mut self) {
        let send = self.send.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let Some(file) = rfd::AsyncFileDialog::new()
                .add_filter("Image", IMAGE_EXTENSIONS)
                .set_title("Select a logo")
                .pick_file()
                .await
            else {
                return;
            };
            let name = file.file_name();
            let bytes = file.read().await;
            match LogoSource::from_named_bytes(name, bytes) {
                Ok(logo) => {
                    if send.send(logo).is_err() {
                        log::debug!(target: "qrstudio::picker", "picker closed before file arrived");
                    }
                }
                Err(err) => log::warn!(target: "qrstudio::picker", "cannot use file as logo: {err}"),
            }
        });
    }

    fn take_picked(&mut self) -> Option<LogoSource> {
        self.recv.try_recv().ok()
    }
}
