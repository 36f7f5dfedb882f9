//! User-adjustable generation parameters.

use std::any::Any;

use image::Rgba;
use qrstudio_states::{State, snapshot_clone};

use crate::GeneratorConfig;
use crate::encoder::{ERROR_CORRECTION, EncodeOptions};
use crate::logo::LogoSource;

pub const MIN_OUTPUT_DIMENSION: u32 = 128;
pub const MAX_OUTPUT_DIMENSION: u32 = 1024;
pub const OUTPUT_DIMENSION_STEP: u32 = 64;
pub const DEFAULT_OUTPUT_DIMENSION: u32 = 256;

pub const MIN_LOGO_SIZE_PERCENT: u32 = 10;
pub const MAX_LOGO_SIZE_PERCENT: u32 = 50;
pub const DEFAULT_LOGO_SIZE_PERCENT: u32 = 20;

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0x00, 0x00, 0x00];
pub const WHITE: Rgb = [0xff, 0xff, 0xff];

/// Clamps into `[128, 1024]` and snaps to the nearest multiple of 64.
pub fn clamp_output_dimension(dimension: u32) -> u32 {
    let clamped = dimension.clamp(MIN_OUTPUT_DIMENSION, MAX_OUTPUT_DIMENSION);
    let steps = (clamped - MIN_OUTPUT_DIMENSION + OUTPUT_DIMENSION_STEP / 2) / OUTPUT_DIMENSION_STEP;
    (MIN_OUTPUT_DIMENSION + steps * OUTPUT_DIMENSION_STEP).min(MAX_OUTPUT_DIMENSION)
}

pub fn clamp_logo_size_percent(percent: u32) -> u32 {
    percent.clamp(MIN_LOGO_SIZE_PERCENT, MAX_LOGO_SIZE_PERCENT)
}

/// Everything a render cycle is computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParameters {
    pub text: String,
    pub foreground: Rgb,
    pub background: Rgb,
    /// Light modules become fully transparent; `background` is kept but unused.
    pub transparent_background: bool,
    pub output_dimension: u32,
    pub logo: Option<LogoSource>,
    pub logo_size_percent: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            text: String::new(),
            foreground: BLACK,
            background: WHITE,
            transparent_background: false,
            output_dimension: DEFAULT_OUTPUT_DIMENSION,
            logo: None,
            logo_size_percent: DEFAULT_LOGO_SIZE_PERCENT,
        }
    }
}

impl GenerationParameters {
    pub fn with_config(config: &GeneratorConfig) -> Self {
        Self {
            output_dimension: config.default_dimension,
            logo_size_percent: config.default_logo_percent,
            ..Self::default()
        }
        .normalize()
    }

    pub fn normalize(mut self) -> Self {
        self.output_dimension = clamp_output_dimension(self.output_dimension);
        self.logo_size_percent = clamp_logo_size_percent(self.logo_size_percent);
        self
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Empty text is never rendered.
    pub fn is_renderable(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn dark_color(&self) -> Rgba<u8> {
        let [r, g, b] = self.foreground;
        Rgba([r, g, b, u8::MAX])
    }

    pub fn light_color(&self) -> Rgba<u8> {
        if self.transparent_background {
            Rgba([0, 0, 0, 0])
        } else {
            let [r, g, b] = self.background;
            Rgba([r, g, b, u8::MAX])
        }
    }

    pub fn encode_options(&self, margin: u32) -> EncodeOptions {
        EncodeOptions {
            ec_level: ERROR_CORRECTION,
            margin,
            width: self.output_dimension,
            dark: self.dark_color(),
            light: self.light_color(),
        }
    }
}

impl State for GenerationParameters {
    fn snapshot(&self) -> Option<Box<dyn Any + Send>> {
        snapshot_clone(self)
    }
}
