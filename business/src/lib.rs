//! QR generation domain: parameters, debounced render pipeline and export.

mod config;
pub mod controller;
mod encoder;
mod error;
pub mod export;
mod logo;
mod logo_preview;
mod params;
mod render;
mod schedule;
mod status;
mod surface;

pub use config::GeneratorConfig;
pub use encoder::{ERROR_CORRECTION, EncodeOptions, QUIET_ZONE_MODULES, SymbolInfo, encode_into};
pub use error::{ExportError, LogoError, RenderError};
pub use export::{EXPORT_FILE_NAME, PngExport};
pub use logo::{LogoHandle, LogoPlacement, LogoSource, composite_logo, decode_logo};
pub use logo_preview::{LogoPreview, LogoPreviewCommand, THUMBNAIL_SIDE, thumbnail};
pub use params::{
    BLACK, DEFAULT_LOGO_SIZE_PERCENT, DEFAULT_OUTPUT_DIMENSION, GenerationParameters,
    MAX_LOGO_SIZE_PERCENT, MAX_OUTPUT_DIMENSION, MIN_LOGO_SIZE_PERCENT, MIN_OUTPUT_DIMENSION,
    OUTPUT_DIMENSION_STEP, Rgb, WHITE, clamp_logo_size_percent, clamp_output_dimension,
};
pub use render::{RenderCommand, RenderOutput, RenderPhase, render_cycle};
pub use schedule::{PendingRender, RenderSchedule};
pub use status::GenerationStatus;
pub use surface::RenderedSurface;
