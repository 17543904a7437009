//! Extract links, fetch each article in turn, compose one report.
//!
//! A run is strictly sequential: extraction finishes before the first fetch,
//! and every fetch finishes before composition starts. Nothing is retried and
//! nothing survives the run.

use anyhow::Context;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::extractor::ArticleRecord;
use crate::fetcher::{ArticleClient, ArticleSource};
use crate::links::extract_links;
use crate::report::{GeminiClient, GenerationError, ReportComposer, ReportResult};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage {
    Idle,
    Extracting,
    /// `current` is 1-based.
    Fetching { current: usize, total: usize },
    Composing,
    Done,
    Failed,
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::Extracting => write!(f, "extracting links"),
            Stage::Fetching { current, total } => write!(f, "fetching {current}/{total}"),
            Stage::Composing => write!(f, "composing report"),
            Stage::Done => write!(f, "done"),
            Stage::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("no article links found in input")]
    NoLinks,

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[derive(Debug, Clone, Serialize)]
pub struct DigestOutcome {
    pub report: ReportResult,
    pub articles: Vec<ArticleRecord>,
}

#[derive(Clone)]
pub struct Digest {
    source: Arc<dyn ArticleSource>,
    composer: ReportComposer,
}

impl Digest {
    pub fn new(source: Arc<dyn ArticleSource>, composer: ReportComposer) -> Self {
        Self { source, composer }
    }

    /// Wire the real article client and Gemini client from configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = ArticleClient::new(config.fetch()).context("building article client")?;
        let generator = GeminiClient::new(config).context("building generation client")?;
        Ok(Self::new(
            Arc::new(source),
            ReportComposer::new(Arc::new(generator)),
        ))
    }

    /// Run the whole pipeline over pasted text, reporting each stage change.
    #[instrument(skip_all)]
    pub async fn run<F>(&self, input: &str, mut on_stage: F) -> Result<DigestOutcome, DigestError>
    where
        F: FnMut(Stage) + Send,
    {
        on_stage(Stage::Extracting);
        let links = extract_links(input);
        if links.is_empty() {
            warn!("no links in submitted text");
            on_stage(Stage::Failed);
            return Err(DigestError::NoLinks);
        }
        info!(count = links.len(), "links extracted");

        let total = links.len();
        let mut articles = Vec::with_capacity(total);
        for (i, link) in links.iter().enumerate() {
            on_stage(Stage::Fetching {
                current: i + 1,
                total,
            });
            articles.push(self.source.fetch_article(link).await);
        }

        on_stage(Stage::Composing);
        match self.composer.compose(&articles).await {
            Ok(report) => {
                on_stage(Stage::Done);
                Ok(DigestOutcome { report, articles })
            }
            Err(e) => {
                on_stage(Stage::Failed);
                Err(e.into())
            }
        }
    }
}
