use std::sync::Arc;

use egui::{ColorImage, TextureHandle, TextureOptions};
use image::RgbaImage;
use qrstudio_business::{GeneratorConfig, LogoSource, RenderedSurface, controller};
use qrstudio_states::StateCtx;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Write the wall clock into `Time` every frame. Tests turn this off and
    /// move the clock by hand.
    pub follow_system_clock: bool,
    /// Result of the last download attempt, shown under the button.
    pub export_message: Option<ExportMessage>,
    preview: Option<PreviewTexture>,
    logo_thumbnail: Option<LogoThumbnail>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportMessage {
    Saved(String),
    Failed(String),
}

struct PreviewTexture {
    surface: Arc<RenderedSurface>,
    texture: TextureHandle,
}

struct LogoThumbnail {
    image: Arc<RgbaImage>,
    texture: TextureHandle,
}

impl Default for State {
    fn default() -> Self {
        Self::new(GeneratorConfig::from_env())
    }
}

impl State {
    pub fn new(config: GeneratorConfig) -> Self {
        let mut ctx = StateCtx::new();
        controller::install(&mut ctx, config);

        Self {
            ctx,
            follow_system_clock: true,
            export_message: None,
            preview: None,
            logo_thumbnail: None,
        }
    }

    /// Default configuration and a manually driven clock.
    pub fn test() -> Self {
        Self {
            follow_system_clock: false,
            ..Self::new(GeneratorConfig::default())
        }
    }

    /// Texture of `surface`, uploaded once per finished render.
    pub fn preview_texture(
        &mut self,
        egui_ctx: &egui::Context,
        surface: &Arc<RenderedSurface>,
    ) -> TextureHandle {
        if let Some(preview) = &self.preview
            && Arc::ptr_eq(&preview.surface, surface)
        {
            return preview.texture.clone();
        }

        let side = surface.dimension() as usize;
        let image = ColorImage::from_rgba_unmultiplied([side, side], surface.as_raw());
        let texture = egui_ctx.load_texture("qr_preview", image, TextureOptions::NEAREST);
        self.preview = Some(PreviewTexture {
            surface: Arc::clone(surface),
            texture: texture.clone(),
        });
        texture
    }

    /// Thumbnail of `logo` once its background decode finished.
    pub fn logo_texture(
        &mut self,
        egui_ctx: &egui::Context,
        logo: &LogoSource,
    ) -> Option<TextureHandle> {
        let image = Arc::clone(controller::logo_preview(&self.ctx)?.thumbnail_for(logo)?);
        if let Some(thumbnail) = &self.logo_thumbnail
            && Arc::ptr_eq(&thumbnail.image, &image)
        {
            return Some(thumbnail.texture.clone());
        }

        let size = [image.width() as usize, image.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        let texture = egui_ctx.load_texture("logo_thumbnail", color_image, TextureOptions::LINEAR);
        self.logo_thumbnail = Some(LogoThumbnail {
            image,
            texture: texture.clone(),
        });
        Some(texture)
    }
}
