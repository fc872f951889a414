//! Interface de terminal do copydeck: spinner e saída colorida.
//!
//! Usa `indicatif` para o spinner de progresso e `console` para cores.
//! O [`RunProgress`] implementa [`PipelineObserver`] e acompanha
//! visualmente cada persona e cada etapa no terminal.

use std::cell::Cell;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::gemini::ModelInfo;
use crate::persona::{Persona, PersonaTable};
use crate::pipeline::{PersonaReport, PipelineObserver, RunSummary, Stage, StageStatus};

/// Indicador visual de progresso para uma execução do pipeline.
///
/// Mostra um spinner com a persona e a etapa atuais, e uma linha colorida
/// por etapa concluída: verde (salvo), vermelho (falha), amarelo (pulado).
pub struct RunProgress {
    // Spinner do indicatif.
    pb: ProgressBar,
    // Total de personas nesta execução.
    total: usize,
    // Índice (1-based) da persona atual.
    current: Cell<usize>,
    green: Style,
    red: Style,
    yellow: Style,
    dim: Style,
}

impl RunProgress {
    /// Inicia o spinner para `total` personas.
    pub fn start(total: usize) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));

        Self {
            pb,
            total,
            current: Cell::new(0),
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    /// Finaliza o spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl PipelineObserver for RunProgress {
    fn persona_started(&self, persona: &Persona) {
        let n = self.current.get() + 1;
        self.current.set(n);
        self.pb.println(format!(
            "\n[{n}/{}] {} ({})",
            self.total,
            persona.id,
            self.dim.apply_to(persona.topic)
        ));
    }

    fn stage_started(&self, persona: &Persona, stage: Stage) {
        self.pb.set_message(format!("{}: generating {stage}...", persona.id));
    }

    fn stage_finished(&self, _persona: &Persona, stage: Stage, status: &StageStatus) {
        let line = match status {
            StageStatus::Written { path } => format!(
                "  {} {stage} saved to {}",
                self.green.apply_to("✓"),
                path.display()
            ),
            StageStatus::Failed { error } => {
                format!("  {} {stage} failed: {error}", self.red.apply_to("✗"))
            }
            StageStatus::Skipped => format!("  {} {stage} skipped", self.yellow.apply_to("–")),
        };
        self.pb.println(line);
    }

    fn persona_finished(&self, report: &PersonaReport) {
        // Stages never reached are only visible here.
        for (stage, status) in report.stages() {
            if *status == StageStatus::Skipped {
                self.pb
                    .println(format!("  {} {stage} skipped", self.yellow.apply_to("–")));
            }
        }
        self.pb.set_message(String::new());
    }

    fn cooling_down(&self, wait: Duration) {
        self.pb
            .set_message(format!("waiting {}s before the next persona...", wait.as_secs()));
    }
}

/// Imprime o resumo final da execução.
pub fn print_summary(summary: &RunSummary) {
    let green = Style::new().green().bold();
    let red = Style::new().red().bold();
    let style = if summary.completed_count() == summary.personas.len() {
        &green
    } else {
        &red
    };

    println!();
    println!("{}", style.apply_to("─── Run Summary ───"));
    println!(
        "run {} · model {} · {:.1}s",
        summary.run_id,
        summary.model,
        summary.duration_ms as f64 / 1000.0
    );
    for report in &summary.personas {
        let marks: Vec<String> = report
            .stages()
            .iter()
            .map(|(stage, status)| match status {
                StageStatus::Written { .. } => format!("{}", green.apply_to(format!("{stage} ✓"))),
                StageStatus::Failed { .. } => format!("{}", red.apply_to(format!("{stage} ✗"))),
                StageStatus::Skipped => format!("{stage} –"),
            })
            .collect();
        println!("  {:<10} {}", report.persona, marks.join("  "));
    }
    println!(
        "{}/{} personas complete",
        summary.completed_count(),
        summary.personas.len()
    );
}

/// Imprime a tabela de personas.
pub fn print_personas(table: &PersonaTable) {
    let bold = Style::new().bold();
    for persona in table.iter() {
        println!("{:<10} {} [{}]", bold.apply_to(persona.id), persona.label, persona.brand);
        println!("           topic: {}", persona.topic);
    }
}

/// Imprime os modelos que suportam `generateContent`.
pub fn print_models(models: &[ModelInfo]) {
    let green = Style::new().green().bold();
    println!("{}", green.apply_to("Models supporting generateContent:"));
    println!("------------------------------------------------");
    for model in models.iter().filter(|m| m.supports_generate_content()) {
        match &model.display_name {
            Some(name) => println!("- {} ({name})", model.id()),
            None => println!("- {}", model.id()),
        }
    }
    println!("------------------------------------------------");
    println!("Pass one of these names with --model or set `model` in copydeck.toml.");
}
