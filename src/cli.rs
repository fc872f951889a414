//! Interface de linha de comando do copydeck baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, models, personas)
//! e flags globais (--model, --max-retries, --base-delay-ms, --config, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

/// copydeck: gera posts de blog, card news e legendas por persona via Gemini.
#[derive(Debug, Parser)]
#[command(name = "copydeck", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Modelo Gemini a usar nesta sessão.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Número máximo de tentativas por chamada.
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Atraso base do backoff exponencial, em milissegundos.
    #[arg(long, global = true)]
    pub base_delay_ms: Option<u64>,

    /// Caminho para um arquivo de configuração TOML.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Emite logs em JSON (uma linha por evento).
    #[arg(long, global = true, default_value_t = false)]
    pub json_logs: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Gera o conteúdo para todas as personas (ou as escolhidas).
    Run {
        /// Persona a processar; pode ser repetido. Sem isso, todas.
        #[arg(long = "persona", short = 'p')]
        personas: Vec<String>,

        /// Diretório de saída dos arquivos gerados.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Pausa entre personas, em segundos.
        #[arg(long)]
        cooldown_secs: Option<u64>,

        /// Não gera a exportação HTML do blog.
        #[arg(long, default_value_t = false)]
        no_html: bool,
    },

    /// Lista os modelos que suportam geração de conteúdo.
    Models,

    /// Mostra as personas embutidas.
    Personas,
}

impl Cli {
    /// Aplica as flags globais e as do subcomando `run` sobre a configuração.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.model = model.clone();
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(base_delay_ms) = self.base_delay_ms {
            config.base_delay_ms = base_delay_ms;
        }
        if let Command::Run {
            output_dir,
            cooldown_secs,
            no_html,
            ..
        } = &self.command
        {
            if let Some(dir) = output_dir {
                config.output_dir = dir.clone();
            }
            if let Some(secs) = cooldown_secs {
                config.cooldown_secs = *secs;
            }
            if *no_html {
                config.html_export = false;
            }
        }
    }
}
