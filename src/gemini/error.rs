//! Tipos de erro para o cliente da API Gemini.
//!
//! Define [`GeminiError`] com variantes para rate limiting, sobrecarga,
//! erros da API, erros de rede e respostas vazias. O método
//! [`GeminiError::classify`] decide se um erro é transitório (vale a pena
//! esperar e retentar) ou fatal.

use thiserror::Error;

use crate::retry::{ErrorClass, TransientKind};

/// Erros que podem ocorrer ao interagir com a API Gemini.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// O servidor retornou HTTP 429 (quota ou rate limit).
    #[error("rate limited (status 429): {message}")]
    RateLimited { message: String },

    /// O servidor retornou HTTP 503 (modelo sobrecarregado ou indisponível).
    #[error("service overloaded (status 503): {message}")]
    Overloaded { message: String },

    /// Qualquer outro erro HTTP (ex.: 400 requisição inválida, 403 chave inválida).
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Falha na camada de transporte (DNS, conexão recusada, timeout, corpo ilegível).
    /// `status` só está presente quando o transporte conhece o código HTTP.
    #[error("network error: {message}")]
    NetworkError { status: Option<u16>, message: String },

    /// A API respondeu 200 mas sem texto utilizável (ex.: bloqueio de segurança).
    #[error("empty response (finish reason: {})", finish_reason.as_deref().unwrap_or("none"))]
    EmptyResponse { finish_reason: Option<String> },
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::NetworkError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl GeminiError {
    /// Builds the error for a non-success HTTP status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            429 => GeminiError::RateLimited { message },
            503 => GeminiError::Overloaded { message },
            _ => GeminiError::ApiError { status, message },
        }
    }

    /// Classifica o erro para a política de retentativa.
    ///
    /// O código HTTP estruturado tem prioridade; a busca por substrings na
    /// mensagem só é usada quando o transporte não expõe um código.
    pub fn classify(&self) -> ErrorClass {
        match self {
            GeminiError::RateLimited { .. } => ErrorClass::Transient(TransientKind::RateLimit),
            GeminiError::Overloaded { .. } => ErrorClass::Transient(TransientKind::Overload),
            GeminiError::ApiError { status, .. } => classify_status(*status),
            GeminiError::NetworkError {
                status: Some(status),
                ..
            } => classify_status(*status),
            GeminiError::NetworkError {
                status: None,
                message,
            } => classify_message(message),
            GeminiError::EmptyResponse { .. } => ErrorClass::Fatal,
        }
    }
}

fn classify_status(status: u16) -> ErrorClass {
    match status {
        429 => ErrorClass::Transient(TransientKind::RateLimit),
        503 => ErrorClass::Transient(TransientKind::Overload),
        _ => ErrorClass::Fatal,
    }
}

/// Fallback classification for errors that carry only a message.
pub fn classify_message(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    if lower.contains("429") {
        ErrorClass::Transient(TransientKind::RateLimit)
    } else if lower.contains("503") || lower.contains("overloaded") {
        ErrorClass::Transient(TransientKind::Overload)
    } else {
        ErrorClass::Fatal
    }
}
