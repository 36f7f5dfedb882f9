use std::time::Duration;

use chrono::Utc;
use qrstudio_business::{LogoSource, controller, export};
use qrstudio_states::Time;

use crate::state::{ExportMessage, State};
use crate::utils::drop_handler::{DropHandler, SystemDropHandler};
use crate::utils::export_sink::{ExportSink, SaveOutcome, SystemExportSink};
use crate::utils::file_picker::{FilePickerHandler, SystemFilePickerHandler};
use crate::widgets;

/// Repaint interval while a render runs off the frame loop.
const RENDER_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// The QR generator application.
///
/// Platform services sit behind traits so tests can swap them:
///
/// ```ignore
/// let app = QrStudioApp::builder()
///     .state(State::test())
///     .export_sink(Box::new(RecordingSink::default()))
///     .build();
/// ```
#[derive(bon::Builder)]
pub struct QrStudioApp {
    state: State,
    #[builder(default = Box::new(SystemDropHandler))]
    drop_handler: Box<dyn DropHandler>,
    #[builder(default = Box::new(SystemFilePickerHandler::default()))]
    file_picker: Box<dyn FilePickerHandler>,
    #[builder(default = Box::new(SystemExportSink))]
    export_sink: Box<dyn ExportSink>,
}

impl QrStudioApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self::builder().state(state).build()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// One frame of the generator inside `ui`.
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        let egui_ctx = ui.ctx().clone();

        if self.state.follow_system_clock {
            self.state
                .ctx
                .update::<Time>(|time| *time.as_mut() = Utc::now());
        }
        controller::tick(&mut self.state.ctx);
        if !controller::generation_status(&self.state.ctx).ready {
            self.state.export_message = None;
        }

        if let Some(logo) = self.drop_handler.handle_drop(&egui_ctx) {
            self.set_logo(logo);
        }
        self.file_picker.handle_shortcut(&egui_ctx);

        let actions = widgets::generator_panel(&mut self.state, ui);

        if actions.pick_logo {
            self.file_picker.request_pick();
        }
        if let Some(logo) = self.file_picker.take_picked() {
            self.set_logo(logo);
        }
        if actions.download {
            self.download();
        }

        self.state.ctx.run_all_dirty();
        self.schedule_repaint(&egui_ctx);
    }

    fn set_logo(&mut self, logo: LogoSource) {
        log::info!(target: "qrstudio::ui", "using {} as logo", logo.name());
        controller::edit_parameters(&mut self.state.ctx, |params| params.logo = Some(logo));
    }

    fn download(&mut self) {
        let saved = export::export_png(&self.state.ctx).and_then(|png| self.export_sink.save(png));
        self.state.export_message = match saved {
            Ok(SaveOutcome::Saved(to)) => {
                log::info!(target: "qrstudio::export", "qr code saved to {to}");
                Some(ExportMessage::Saved(to))
            }
            Ok(SaveOutcome::Cancelled) => None,
            Err(err) => {
                log::error!(target: "qrstudio::export", "export failed: {err}");
                Some(ExportMessage::Failed(err.to_string()))
            }
        };
    }

    /// Wakes the frame loop when the debounce elapses or a render may finish;
    /// egui would otherwise sleep until the next input event.
    fn schedule_repaint(&self, egui_ctx: &egui::Context) {
        if let Some(wait) = controller::time_until_due(&self.state.ctx) {
            egui_ctx.request_repaint_after(wait);
        } else if controller::is_rendering(&self.state.ctx) {
            egui_ctx.request_repaint_after(RENDER_POLL_INTERVAL);
        }
    }
}

impl eframe::App for QrStudioApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.ui(ui));
        });
    }
}
