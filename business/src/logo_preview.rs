//! Logo thumbnail for the UI, decoded off the frame loop.
//!
//! Changing the logo dispatches [`LogoPreviewCommand`]. It decodes the logo
//! the same way a render does and publishes a small [`LogoPreview`] back through
//! the `Updater`. Previews are stamped with the parameter generation they were
//! requested for, and older ones never replace newer ones.

use std::sync::Arc;

use image::RgbaImage;
use image::imageops;
use qrstudio_states::{
    Command, CommandFuture, CommandSnapshot, Compute, ComputeDeps, Dep, Updater,
};
use tokio_util::sync::CancellationToken;

use crate::logo::{LogoSource, decode_logo};
use crate::{GenerationParameters, RenderSchedule};

/// Longest side of the thumbnail, in pixels.
pub const THUMBNAIL_SIDE: u32 = 64;

#[derive(Debug, Clone, Default)]
pub struct LogoPreview {
    pub generation: u64,
    /// Logo the preview was made from; `None` once the logo was removed.
    pub logo: Option<LogoSource>,
    pub thumbnail: Option<Arc<RgbaImage>>,
    pub error: Option<String>,
}

impl LogoPreview {
    pub fn cleared(generation: u64) -> Self {
        Self {
            generation,
            ..Self::default()
        }
    }

    pub fn failed(generation: u64, logo: LogoSource, error: impl ToString) -> Self {
        Self {
            generation,
            logo: Some(logo),
            thumbnail: None,
            error: Some(error.to_string()),
        }
    }

    fn is_for(&self, logo: &LogoSource) -> bool {
        self.logo.as_ref() == Some(logo)
    }

    /// The thumbnail, only when it was made from `logo`.
    pub fn thumbnail_for(&self, logo: &LogoSource) -> Option<&Arc<RgbaImage>> {
        self.thumbnail.as_ref().filter(|_| self.is_for(logo))
    }

    pub fn failed_for(&self, logo: &LogoSource) -> bool {
        self.error.is_some() && self.is_for(logo)
    }
}

impl Compute for LogoPreview {
    fn deps(&self) -> ComputeDeps {
        ComputeDeps::new()
    }

    fn compute(&self, _deps: Dep<'_>, _updater: Updater) {
        // written by LogoPreviewCommand and the controller only
    }

    fn assign(&mut self, incoming: Self) {
        if incoming.generation < self.generation {
            log::debug!(
                target: "qrstudio::render",
                "dropping stale logo preview (generation {} < {})",
                incoming.generation,
                self.generation
            );
            return;
        }
        *self = incoming;
    }
}

/// Scales `image` so its longest side is `side`, keeping the aspect ratio.
pub fn thumbnail(image: &RgbaImage, side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let longest = w.max(h).max(1);
    let tw = (u64::from(w) * u64::from(side) / u64::from(longest)).max(1);
    let th = (u64::from(h) * u64::from(side) / u64::from(longest)).max(1);
    imageops::thumbnail(
        image,
        u32::try_from(tw).unwrap_or(side),
        u32::try_from(th).unwrap_or(side),
    )
}

/// Decodes the logo of the snapshot into a [`LogoPreview`].
#[derive(Debug, Default)]
pub struct LogoPreviewCommand;

impl Command for LogoPreviewCommand {
    fn run(
        &self,
        snap: CommandSnapshot,
        updater: Updater,
        cancel: CancellationToken,
    ) -> CommandFuture {
        let logo = snap
            .state::<GenerationParameters>()
            .and_then(|params| params.logo.clone());
        let generation = snap
            .state::<RenderSchedule>()
            .map_or(0, RenderSchedule::generation);

        Box::pin(async move {
            let Some(logo) = logo else {
                updater.set(LogoPreview::cleared(generation));
                return;
            };

            let decoded = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    log::trace!(target: "qrstudio::render", "logo preview {generation} cancelled");
                    return;
                }
                decoded = decode_logo(logo.acquire()) => decoded,
            };

            let preview = match decoded {
                Ok(image) => LogoPreview {
                    generation,
                    thumbnail: Some(Arc::new(thumbnail(&image, THUMBNAIL_SIDE))),
                    logo: Some(logo),
                    error: None,
                },
                Err(err) => {
                    log::debug!(
                        target: "qrstudio::render",
                        "no preview for logo {}: {err}",
                        logo.name()
                    );
                    LogoPreview::failed(generation, logo, err)
                }
            };
            updater.set(preview);
        })
    }
}
