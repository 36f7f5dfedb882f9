use qrcode::types::QrError;
use thiserror::Error;

/// Failure of a single render cycle.
///
/// Every variant is caught by [`RenderCommand`](crate::RenderCommand) and turned
/// into a failed [`RenderOutput`](crate::RenderOutput); nothing is retried.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("text does not fit into a level-H QR code: {0}")]
    Encoding(QrError),

    #[error("{dimension}px is too small for the symbol, at least {required}px are required")]
    DimensionTooSmall { dimension: u32, required: u32 },

    #[error("logo could not be decoded: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("render resource unavailable: {0}")]
    ResourceHandle(String),

    #[error("render superseded by a newer generation")]
    Cancelled,
}

// `QrError` does not implement `std::error::Error`, so it can't be a `#[source]`.
impl From<QrError> for RenderError {
    fn from(err: QrError) -> Self {
        Self::Encoding(err)
    }
}

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("{mime} is not an image type")]
    NotAnImage { mime: String },

    #[error("logo file is empty")]
    Empty,

    #[error("failed to read logo file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no finished render to export")]
    NotReady,

    #[error("PNG encoding failed: {0}")]
    Png(#[from] image::ImageError),

    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    #[error("download was refused: {0}")]
    Platform(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_errors_map_to_encoding() {
        let err = RenderError::from(QrError::DataTooLong);
        assert!(matches!(err, RenderError::Encoding(QrError::DataTooLong)));
        assert!(err.to_string().starts_with("text does not fit"));
    }

    #[test]
    fn dimension_message_names_both_sizes() {
        let err = RenderError::DimensionTooSmall {
            dimension: 128,
            required: 181,
        };
        let msg = err.to_string();
        assert!(msg.contains("128px") && msg.contains("181px"), "{msg}");
    }
}
