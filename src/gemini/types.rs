//! Tipos de dados para requisições e respostas da API Gemini `generateContent`.
//!
//! [`GenerationRequest`] é a forma independente de transporte que o resto do
//! crate constrói; as structs `*Body` e `*Response` espelham o JSON do
//! endpoint `v1beta` e só são usadas pelo [`GeminiClient`](super::GeminiClient).

use serde::{Deserialize, Serialize};

/// Formato de saída solicitado ao modelo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Texto livre.
    #[default]
    Text,
    /// JSON estrito (`responseMimeType: application/json`).
    Json,
}

/// Uma requisição de geração: prompt, modelo e instrução de sistema opcional.
///
/// Imutável depois de construída; os métodos `with_*` consomem e devolvem `Self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    model: String,
    prompt: String,
    system_instruction: Option<String>,
    format: OutputFormat,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system_instruction: None,
            format: OutputFormat::Text,
        }
    }

    /// Define a instrução de sistema (o papel/estilo da persona).
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Pede saída em JSON estrito.
    pub fn json(mut self) -> Self {
        self.format = OutputFormat::Json;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Converte para o corpo JSON esperado pelo endpoint.
    pub(crate) fn to_body(&self) -> GenerateContentBody {
        GenerateContentBody {
            system_instruction: self.system_instruction.as_ref().map(|text| Content {
                role: None,
                parts: vec![Part { text: text.clone() }],
            }),
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![Part {
                    text: self.prompt.clone(),
                }],
            }],
            generation_config: match self.format {
                OutputFormat::Json => Some(GenerationConfig {
                    response_mime_type: "application/json".into(),
                }),
                OutputFormat::Text => None,
            },
        }
    }
}

/// Corpo da requisição para `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Um turno da conversa: papel opcional e partes textuais.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Uma parte textual de um [`Content`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
}

/// Resposta do endpoint `generateContent`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Texto do primeiro candidato, com todas as partes concatenadas.
    /// `None` quando não há candidato ou o candidato não tem texto.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let content = candidate.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Estatísticas de consumo de tokens para uma chamada.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// Corpo de erro padrão das APIs Google: `{"error": {"code", "message", "status"}}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// Uma página do endpoint `GET models`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Metadados de um modelo publicado pelo provedor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Nome completo, ex.: `models/gemini-flash-lite-latest`.
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    /// Identificador sem o prefixo `models/`, como usado em `--model`.
    pub fn id(&self) -> &str {
        self.name.strip_prefix("models/").unwrap_or(&self.name)
    }

    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}
