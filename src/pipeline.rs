use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{error, info};
use uuid::Uuid;

use crate::content::{BlogPost, CardDeck};
use crate::gemini::{ContentGenerator, GenerationRequest};
use crate::output::OutputWriter;
use crate::persona::Persona;
use crate::prompts::{blog_prompt, caption_prompt, card_prompt};
use crate::retry::{Failure, ResilientCaller};

/// The three generation steps run for every persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Blog,
    Cards,
    Caption,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Blog => write!(f, "blog post"),
            Stage::Cards => write!(f, "card news"),
            Stage::Caption => write!(f, "caption"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageError {
    #[error("{0}")]
    Generation(Failure),
    #[error("output error: {0}")]
    Output(String),
}

/// How one stage ended for one persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Written { path: PathBuf },
    Failed { error: StageError },
    /// Never attempted because an earlier stage produced nothing.
    Skipped,
}

/// Per-persona record of what the pipeline produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaReport {
    pub persona: String,
    pub blog: StageStatus,
    pub cards: StageStatus,
    pub caption: StageStatus,
}

impl PersonaReport {
    fn new(persona: &Persona) -> Self {
        Self {
            persona: persona.id.to_string(),
            blog: StageStatus::Skipped,
            cards: StageStatus::Skipped,
            caption: StageStatus::Skipped,
        }
    }

    pub fn is_complete(&self) -> bool {
        [&self.blog, &self.cards, &self.caption]
            .iter()
            .all(|s| matches!(s, StageStatus::Written { .. }))
    }

    pub fn stages(&self) -> [(Stage, &StageStatus); 3] {
        [
            (Stage::Blog, &self.blog),
            (Stage::Cards, &self.cards),
            (Stage::Caption, &self.caption),
        ]
    }
}

/// Audit record for a whole run, written next to the generated files.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub personas: Vec<PersonaReport>,
}

impl RunSummary {
    pub fn completed_count(&self) -> usize {
        self.personas.iter().filter(|p| p.is_complete()).count()
    }
}

/// Progress hooks; every method defaults to doing nothing.
pub trait PipelineObserver {
    fn persona_started(&self, _persona: &Persona) {}
    fn stage_started(&self, _persona: &Persona, _stage: Stage) {}
    fn stage_finished(&self, _persona: &Persona, _stage: Stage, _status: &StageStatus) {}
    fn persona_finished(&self, _report: &PersonaReport) {}
    fn cooling_down(&self, _wait: Duration) {}
}

/// Observer that ignores every event.
pub struct Silent;

impl PipelineObserver for Silent {}

/// Runs blog → cards → caption for each persona, one call at a time.
pub struct ContentPipeline<G> {
    caller: ResilientCaller<G>,
    writer: OutputWriter,
    model: String,
    cooldown: Duration,
}

impl<G: ContentGenerator> ContentPipeline<G> {
    pub fn new(
        caller: ResilientCaller<G>,
        writer: OutputWriter,
        model: impl Into<String>,
        cooldown: Duration,
    ) -> Self {
        Self {
            caller,
            writer,
            model: model.into(),
            cooldown,
        }
    }

    /// Process every persona in order. Failures are recorded, never raised.
    pub async fn run(&self, personas: &[&Persona], observer: &impl PipelineObserver) -> RunSummary {
        let started_at = Utc::now();
        let mut reports = Vec::with_capacity(personas.len());

        for (i, persona) in personas.iter().enumerate() {
            if i > 0 && !self.cooldown.is_zero() {
                info!("cooling down for {}s before next persona", self.cooldown.as_secs());
                observer.cooling_down(self.cooldown);
                sleep(self.cooldown).await;
            }
            let report = self.run_persona(persona, observer).await;
            observer.persona_finished(&report);
            reports.push(report);
        }

        let completed_at = Utc::now();
        RunSummary {
            run_id: Uuid::new_v4().to_string(),
            model: self.model.clone(),
            started_at,
            completed_at,
            duration_ms: (completed_at - started_at).num_milliseconds(),
            personas: reports,
        }
    }

    /// Run the three stages for one persona. A stage whose input is missing
    /// is left as `Skipped`.
    pub async fn run_persona(
        &self,
        persona: &Persona,
        observer: &impl PipelineObserver,
    ) -> PersonaReport {
        let mut report = PersonaReport::new(persona);
        observer.persona_started(persona);

        // BLOG
        observer.stage_started(persona, Stage::Blog);
        let req = GenerationRequest::new(&self.model, blog_prompt(persona))
            .with_system_instruction(persona.system_instruction())
            .json();
        let generated = self.caller.call_json::<BlogPost>(&req).await;
        let (status, post) = self.finish_stage(persona, Stage::Blog, generated, |post| {
            self.writer.write_blog(persona.slug, post)
        });
        report.blog = status;
        observer.stage_finished(persona, Stage::Blog, &report.blog);
        let Some(post) = post else {
            return report;
        };

        // CARDS
        observer.stage_started(persona, Stage::Cards);
        let req = GenerationRequest::new(&self.model, card_prompt(persona, &post)).json();
        let generated = self
            .caller
            .call_json::<CardDeck>(&req)
            .await
            .map(|deck| deck.with_default_brand(persona.brand));
        let (status, deck) = self.finish_stage(persona, Stage::Cards, generated, |deck| {
            self.writer.write_cards(persona.slug, deck)
        });
        report.cards = status;
        observer.stage_finished(persona, Stage::Cards, &report.cards);
        let Some(deck) = deck else {
            return report;
        };

        // CAPTION
        observer.stage_started(persona, Stage::Caption);
        let req = GenerationRequest::new(&self.model, caption_prompt(persona, &post, &deck));
        let generated = self
            .caller
            .call(&req)
            .await
            .into_result()
            .map(|text| text.trim().to_string());
        let (status, _) = self.finish_stage(persona, Stage::Caption, generated, |caption| {
            self.writer.write_caption(persona.slug, caption)
        });
        report.caption = status;
        observer.stage_finished(persona, Stage::Caption, &report.caption);

        report
    }

    /// Write a generated value and log the result. The value is handed back
    /// whenever it was generated, even if writing it failed, since later
    /// stages only need the value itself.
    fn finish_stage<T>(
        &self,
        persona: &Persona,
        stage: Stage,
        generated: Result<T, Failure>,
        write: impl FnOnce(&T) -> anyhow::Result<PathBuf>,
    ) -> (StageStatus, Option<T>) {
        let value = match generated {
            Ok(value) => value,
            Err(failure) => {
                error!(persona = persona.id, %stage, "generation failed: {failure}");
                let status = StageStatus::Failed {
                    error: StageError::Generation(failure),
                };
                return (status, None);
            }
        };

        let status = match write(&value) {
            Ok(path) => {
                info!(persona = persona.id, %stage, path = %path.display(), "saved");
                StageStatus::Written { path }
            }
            Err(e) => {
                error!(persona = persona.id, %stage, "could not save output: {e:#}");
                StageStatus::Failed {
                    error: StageError::Output(format!("{e:#}")),
                }
            }
        };
        (status, Some(value))
    }
}
