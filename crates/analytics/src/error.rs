use thiserror::Error;

/// Errors raised while turning chart data into image or document bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{format} encoding failed: {reason}")]
    Encode {
        format: &'static str,
        reason: String,
    },
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
}

impl RenderError {
    pub fn encode(format: &'static str, reason: impl ToString) -> Self {
        RenderError::Encode {
            format,
            reason: reason.to_string(),
        }
    }
}
