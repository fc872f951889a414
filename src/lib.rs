//! Persona-driven content generation on top of the Gemini API.
//!
//! For each persona the pipeline asks the model for a blog post, derives a
//! card-news outline from it, then a social caption from both, and writes the
//! results to disk. Every remote call goes through [`retry::ResilientCaller`],
//! which retries rate-limit and overload errors with exponential backoff.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod gemini;
pub mod html;
pub mod normalize;
pub mod output;
pub mod persona;
pub mod pipeline;
pub mod prompts;
pub mod retry;
pub mod telemetry;
pub mod ui;
