//! Writing generated content to the output directory.
//!
//! File names follow `post_{slug}.md`, `post_{slug}.html`,
//! `card_data_{slug}.json` and `insta_caption_{slug}.txt`. Nothing written
//! here is ever read back.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use crate::content::{BlogPost, CardDeck};
use crate::html::render_blog_html;

pub const SUMMARY_FILE: &str = "run_summary.json";

/// Writes one kind of document per call into a fixed directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
    html_export: bool,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>, html_export: bool) -> Self {
        Self {
            dir: dir.into(),
            html_export,
        }
    }

    /// Writes the markdown post, plus the HTML export when enabled.
    /// Returns the markdown path. If the HTML export cannot be written the
    /// markdown file is removed again, so a failed post leaves nothing behind.
    pub fn write_blog(&self, slug: &str, post: &BlogPost) -> Result<PathBuf> {
        let markdown = post.to_markdown();
        let html = self.html_export.then(|| render_blog_html(post));

        let path = self.write(&format!("post_{slug}.md"), &markdown)?;
        if let Some(html) = html
            && let Err(e) = self.write(&format!("post_{slug}.html"), &html)
        {
            remove_partial(&path);
            return Err(e);
        }
        Ok(path)
    }

    pub fn write_cards(&self, slug: &str, deck: &CardDeck) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(deck)?;
        self.write(&format!("card_data_{slug}.json"), &json)
    }

    pub fn write_caption(&self, slug: &str, caption: &str) -> Result<PathBuf> {
        self.write(&format!("insta_caption_{slug}.txt"), caption)
    }

    pub fn write_summary(&self, summary: &impl Serialize) -> Result<PathBuf> {
        let json = serde_json::to_string_pretty(summary)?;
        self.write(SUMMARY_FILE, &json)
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.dir.join(name);
        if let Err(e) = fs::write(&path, contents) {
            remove_partial(&path);
            return Err(e).with_context(|| format!("failed to write {}", path.display()));
        }
        Ok(path)
    }
}

fn remove_partial(path: &Path) {
    if path.is_file()
        && let Err(e) = fs::remove_file(path)
    {
        warn!("could not remove partial output {}: {e}", path.display());
    }
}
