mod color_controls;
mod content_input;
mod download_button;
mod generator_panel;
mod logo_panel;
mod qr_preview;
mod size_slider;

pub use color_controls::color_controls;
pub use content_input::content_input;
pub use download_button::download_button;
pub use generator_panel::{PanelActions, generator_panel};
pub use logo_panel::logo_panel;
pub use qr_preview::qr_preview;
pub use size_slider::size_slider;
