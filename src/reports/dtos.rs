use serde::{Deserialize, Serialize};

use crate::digest::DigestOutcome;
use crate::extractor::FetchStatus;

/// Largest paste we accept from the form or the API.
pub const MAX_INPUT_LEN: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    #[serde(default)]
    pub links: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadForm {
    pub report: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateReportRequest {
    pub links: String,
}

impl CreateReportRequest {
    pub fn validate(&self) -> Result<(), String> {
        validate_links_input(&self.links)
    }
}

pub fn validate_links_input(links: &str) -> Result<(), String> {
    if links.len() > MAX_INPUT_LEN {
        return Err("Input too long".to_string());
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub url: String,
    pub title: String,
    pub status: FetchStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub report: String,
    pub articles: Vec<ArticleSummary>,
}

impl From<DigestOutcome> for ReportResponse {
    fn from(outcome: DigestOutcome) -> Self {
        Self {
            report: outcome.report.markdown,
            articles: outcome
                .articles
                .into_iter()
                .map(|a| ArticleSummary {
                    url: a.source_url,
                    title: a.title,
                    status: a.status,
                })
                .collect(),
        }
    }
}
