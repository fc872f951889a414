use anyhow::Result;
use clap::Parser;
use tracing::{Level, info};

use copydeck::cli::{Cli, Command};
use copydeck::config::AppConfig;
use copydeck::gemini::GeminiClient;
use copydeck::output::OutputWriter;
use copydeck::persona::PersonaTable;
use copydeck::pipeline::ContentPipeline;
use copydeck::retry::ResilientCaller;
use copydeck::telemetry::init_tracing;
use copydeck::ui::{RunProgress, print_models, print_personas, print_summary};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(cli.json_logs, level);

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    let personas = PersonaTable::builtin();

    match &cli.command {
        Command::Personas => {
            print_personas(&personas);
        }
        Command::Models => {
            let client = GeminiClient::new(config.require_api_key()?.to_string())?;
            let models = client.list_models().await?;
            print_models(&models);
        }
        Command::Run {
            personas: selected,
            ..
        } => {
            let selected = personas.select(selected)?;
            let client = GeminiClient::new(config.require_api_key()?.to_string())?;
            let writer = OutputWriter::new(&config.output_dir, config.html_export);
            let pipeline = ContentPipeline::new(
                ResilientCaller::new(&client, config.retry_policy()),
                writer.clone(),
                &config.model,
                config.cooldown(),
            );

            info!(
                model = %config.model,
                personas = selected.len(),
                "starting content generation"
            );
            let progress = RunProgress::start(selected.len());
            let summary = pipeline.run(&selected, &progress).await;
            progress.finish();

            let path = writer.write_summary(&summary)?;
            print_summary(&summary);
            println!("Summary written to {}", path.display());
        }
    }

    Ok(())
}
