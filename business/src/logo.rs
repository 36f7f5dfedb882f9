//! Logo overlay: source bytes, scoped decode handles and compositing.
//!
//! A [`LogoSource`] is the user's file as it was picked or dropped. Decoding
//! goes through a [`LogoHandle`] obtained with [`LogoSource::acquire`]; the
//! handle is released when dropped, whichever way the decode ends. The number
//! of outstanding handles is observable through [`LogoSource::live_handles`].
//!
//! The first successful decode is kept with the source and shared by its
//! clones, so the preview and every later render reuse the same pixels.

use std::sync::{Arc, OnceLock};
use std::sync::atomic::{AtomicUsize, Ordering};

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{LogoError, RenderError};
use crate::surface::RenderedSurface;

#[derive(Clone)]
pub struct LogoSource {
    name: String,
    mime: String,
    bytes: Arc<[u8]>,
    live: Arc<AtomicUsize>,
    decoded: Arc<OnceLock<Arc<RgbaImage>>>,
}

impl std::fmt::Debug for LogoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoSource")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .field("decoded", &self.decoded.get().is_some())
            .finish()
    }
}

impl PartialEq for LogoSource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.mime == other.mime
            && (Arc::ptr_eq(&self.bytes, &other.bytes) || self.bytes == other.bytes)
    }
}

impl Eq for LogoSource {}

impl LogoSource {
    /// Accepts only `image/*` MIME types with a non-empty payload.
    pub fn new(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, LogoError> {
        let mime = mime.into();
        if !mime.starts_with("image/") {
            return Err(LogoError::NotAnImage { mime });
        }
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(LogoError::Empty);
        }
        Ok(Self {
            name: name.into(),
            mime,
            bytes,
            live: Arc::new(AtomicUsize::new(0)),
            decoded: Arc::new(OnceLock::new()),
        })
    }

    /// Like [`LogoSource::new`], guessing the MIME type from the file name.
    pub fn from_named_bytes(
        name: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Result<Self, LogoError> {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        Self::new(name, mime, bytes)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> Result<Self, LogoError> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        if !mime.starts_with("image/") {
            return Err(LogoError::NotAnImage { mime });
        }
        let bytes = std::fs::read(path)?;
        Self::new(name, mime, bytes)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn acquire(&self) -> LogoHandle {
        self.live.fetch_add(1, Ordering::AcqRel);
        LogoHandle {
            bytes: Arc::clone(&self.bytes),
            live: Arc::clone(&self.live),
            decoded: Arc::clone(&self.decoded),
        }
    }

    /// Handles acquired from this source (or its clones) that are still alive.
    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }
}

/// Temporary reference to a logo's bytes, released on drop.
#[derive(Debug)]
pub struct LogoHandle {
    bytes: Arc<[u8]>,
    live: Arc<AtomicUsize>,
    decoded: Arc<OnceLock<Arc<RgbaImage>>>,
}

impl LogoHandle {
    /// Decoded pixels, from the cache when an earlier decode succeeded.
    /// Failures are not cached.
    pub fn decode(&self) -> Result<Arc<RgbaImage>, RenderError> {
        if let Some(image) = self.decoded.get() {
            return Ok(Arc::clone(image));
        }
        let image = Arc::new(image::load_from_memory(&self.bytes)?.to_rgba8());
        Ok(Arc::clone(self.decoded.get_or_init(|| image)))
    }
}

impl Drop for LogoHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Decodes the logo off the UI thread. The handle is released once decoding
/// finishes, even if the caller stopped waiting.
#[cfg(not(target_arch = "wasm32"))]
pub async fn decode_logo(handle: LogoHandle) -> Result<Arc<RgbaImage>, RenderError> {
    tokio::task::spawn_blocking(move || handle.decode())
        .await
        .map_err(|err| RenderError::ResourceHandle(err.to_string()))?
}

#[cfg(target_arch = "wasm32")]
pub async fn decode_logo(handle: LogoHandle) -> Result<Arc<RgbaImage>, RenderError> {
    handle.decode()
}

/// Square region the logo is drawn into, centered on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoPlacement {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

impl LogoPlacement {
    pub fn new(dimension: u32, percent: u32) -> Self {
        let side = dimension.saturating_mul(percent) / 100;
        let side = side.min(dimension);
        let offset = (dimension - side) / 2;
        Self {
            x: offset,
            y: offset,
            side,
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        (self.x..self.x + self.side).contains(&x) && (self.y..self.y + self.side).contains(&y)
    }
}

/// Scales `logo` into `placement` and draws it over the symbol.
pub fn composite_logo(surface: &mut RenderedSurface, logo: &RgbaImage, placement: LogoPlacement) {
    if placement.side == 0 || logo.width() == 0 || logo.height() == 0 {
        return;
    }
    let scaled = imageops::resize(logo, placement.side, placement.side, FilterType::Triangle);
    imageops::overlay(
        surface.image_mut(),
        &scaled,
        i64::from(placement.x),
        i64::from(placement.y),
    );
}
