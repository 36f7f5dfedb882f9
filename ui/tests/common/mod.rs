#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use egui_kittest::Harness;
use image::{ImageFormat, Rgba, RgbaImage};
use qrstudio_business::{ExportError, GenerationParameters, LogoSource, PngExport, controller};
use qrstudio_states::Time;
use qrstudio_ui::QrStudioApp;
use qrstudio_ui::state::State;
use qrstudio_ui::utils::export_sink::{ExportSink, SaveOutcome};
use qrstudio_ui::utils::file_picker::FilePickerHandler;

pub type AppHarness = Harness<'static, QrStudioApp>;

/// Tall enough to show the whole form next to a full-size preview.
pub fn harness(app: QrStudioApp) -> AppHarness {
    Harness::builder()
        .with_size(egui::vec2(640.0, 1200.0))
        .build_ui_state(|ui, app: &mut QrStudioApp| app.ui(ui), app)
}

pub fn default_harness() -> AppHarness {
    harness(QrStudioApp::new(State::test()))
}

pub fn params(harness: &AppHarness) -> &GenerationParameters {
    harness.state().state().ctx.state::<GenerationParameters>()
}

pub fn edit(harness: &mut AppHarness, edit: impl FnOnce(&mut GenerationParameters)) {
    controller::edit_parameters(&mut harness.state_mut().state_mut().ctx, edit);
}

pub fn advance_clock(harness: &mut AppHarness, ms: i64) {
    harness
        .state_mut()
        .state_mut()
        .ctx
        .update::<Time>(|time| *time.as_mut() += chrono::Duration::milliseconds(ms));
}

/// Lets the debounce elapse, then steps frames until the render ends.
pub async fn wait_for_render(harness: &mut AppHarness) {
    advance_clock(harness, 100);
    for _ in 0..300 {
        harness.step();
        let status = controller::generation_status(&harness.state().state().ctx);
        if status.ready || status.is_failed() {
            // Draw once more with the final status.
            harness.step();
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("render did not finish");
}

pub fn png_logo() -> Vec<u8> {
    let img = RgbaImage::from_pixel(24, 24, Rgba([0xd0, 0x20, 0x20, 0xff]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

pub fn logo() -> LogoSource {
    LogoSource::new("brand.png", "image/png", png_logo()).expect("valid logo")
}

/// Keeps every export in memory.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub saved: Arc<Mutex<Vec<PngExport>>>,
}

impl ExportSink for RecordingSink {
    fn save(&mut self, export: PngExport) -> Result<SaveOutcome, ExportError> {
        let to = format!("memory/{}", export.file_name);
        self.saved.lock().expect("lock").push(export);
        Ok(SaveOutcome::Saved(to))
    }
}

pub struct FailingSink;

impl ExportSink for FailingSink {
    fn save(&mut self, _export: PngExport) -> Result<SaveOutcome, ExportError> {
        Err(ExportError::Platform("disk full".to_owned()))
    }
}

/// Answers every pick request with the same logo.
#[derive(Clone, Default)]
pub struct StubPicker {
    pub requests: Arc<Mutex<usize>>,
    picked: Option<LogoSource>,
}

impl FilePickerHandler for StubPicker {
    fn request_pick(&mut self) {
        *self.requests.lock().expect("lock") += 1;
        self.picked = Some(logo());
    }

    fn take_picked(&mut self) -> Option<LogoSource> {
        self.picked.take()
    }
}
