//! Configuração do copydeck carregada a partir de `copydeck.toml`.
//!
//! A struct [`AppConfig`] contém os parâmetros ajustáveis do pipeline.
//! Valores não presentes no arquivo usam defaults sensíveis; o arquivo é
//! opcional. A variável de ambiente `GEMINI_API_KEY` tem precedência sobre
//! o arquivo, e um `.env` no diretório atual é carregado antes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AppError;
use crate::retry::RetryPolicy;

pub const CONFIG_FILE: &str = "copydeck.toml";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Configuração de nível superior carregada de `copydeck.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Chave da API Gemini.
    #[serde(default)]
    pub api_key: String,

    /// Identificador do modelo usado em todas as etapas.
    #[serde(default = "default_model")]
    pub model: String,

    /// Tentativas por chamada antes de desistir.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Atraso base em milissegundos para backoff exponencial.
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    /// Pausa entre personas, em segundos.
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Diretório onde os arquivos gerados são gravados.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Gera também `post_{slug}.html`.
    #[serde(default = "default_html_export")]
    pub html_export: bool,
}

// Valor padrão para o modelo.
fn default_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

// Valor padrão para tentativas: 5.
fn default_max_retries() -> u32 {
    5
}

// Valor padrão para o atraso base: 10s.
fn default_base_delay_ms() -> u64 {
    10_000
}

// Valor padrão para a pausa entre personas: 10s.
fn default_cooldown_secs() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_html_export() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
            cooldown_secs: default_cooldown_secs(),
            output_dir: default_output_dir(),
            html_export: default_html_export(),
        }
    }
}

impl AppConfig {
    /// Carrega `.env`, depois o arquivo de configuração (se existir), depois
    /// aplica `GEMINI_API_KEY`.
    ///
    /// Sem `path`, usa `copydeck.toml` no diretório atual e ignora sua
    /// ausência. Um `path` explícito que não existe é um erro.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Ok(toml::from_str::<AppConfig>(&contents)?)
    }

    /// Variável de ambiente tem precedência sobre o arquivo para a chave API.
    pub fn apply_env_key(&mut self, key: Option<String>) {
        if let Some(key) = key
            && !key.trim().is_empty()
        {
            self.api_key = key.trim().to_string();
        }
    }

    /// A chave API, ou [`AppError::MissingApiKey`] se não configurada.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        if self.api_key.trim().is_empty() {
            Err(AppError::MissingApiKey)
        } else {
            Ok(&self.api_key)
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            base_delay_ms: self.base_delay_ms,
        }
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
