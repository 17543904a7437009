use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::extractor::ArticleRecord;
use crate::report::{
    errors::GenerationError,
    gemini::TextGenerator,
    prompt::{build_prompt, join_articles},
};

/// Markdown exactly as the service returned it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportResult {
    pub markdown: String,
    pub article_count: usize,
}

#[derive(Clone)]
pub struct ReportComposer {
    generator: Arc<dyn TextGenerator>,
}

impl ReportComposer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the prompt from `records` and make one generation call.
    #[instrument(skip_all, fields(articles = records.len()))]
    pub async fn compose(&self, records: &[ArticleRecord]) -> Result<ReportResult, GenerationError> {
        let prompt = build_prompt(&join_articles(records));

        match self.generator.generate(&prompt).await {
            Ok(markdown) => {
                info!(chars = markdown.chars().count(), "report generated");
                Ok(ReportResult {
                    markdown,
                    article_count: records.len(),
                })
            }
            Err(e) => {
                error!(error = %e, "report generation failed");
                Err(e)
            }
        }
    }
}
