use thiserror::Error;

use crate::gemini::GeminiError;

/// Errors that stop the process before or outside the pipeline.
///
/// Failures inside the pipeline never surface here; they are recorded per
/// stage in the run summary instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("GEMINI_API_KEY is not set. Export it or add it to .env.")]
    MissingApiKey,

    #[error("Unknown persona: {0}. Run `copydeck personas` to list them.")]
    UnknownPersona(String),

    #[error("Gemini API error: {0}")]
    Gemini(#[from] GeminiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_persona_display() {
        let err = AppError::UnknownPersona("ALIEN".into());
        assert_eq!(
            err.to_string(),
            "Unknown persona: ALIEN. Run `copydeck personas` to list them."
        );
    }

    #[test]
    fn gemini_error_converts() {
        let err: AppError = GeminiError::ApiError {
            status: 403,
            message: "denied".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Gemini API error: API error (status 403): denied"
        );
    }
}
