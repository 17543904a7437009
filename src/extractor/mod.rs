pub mod block;
pub mod model;
pub mod reader;

#[cfg(test)]
mod tests;

pub use block::BlockMarkers;
pub use model::{ArticleRecord, FetchStatus, UNTITLED, truncate_chars};
pub use reader::{SelectorError, Selectors};

use tracing::debug;

use crate::config::FetchSettings;

/// Turns a fetched page into an [`ArticleRecord`].
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Selectors,
    markers: BlockMarkers,
    max_body_chars: usize,
}

impl Extractor {
    pub fn new(selectors: Selectors, markers: BlockMarkers, max_body_chars: usize) -> Self {
        Self {
            selectors,
            markers,
            max_body_chars,
        }
    }

    pub fn from_settings(settings: &FetchSettings) -> Result<Self, SelectorError> {
        let selectors = Selectors::parse(&settings.title_selector, &settings.body_selector)?;
        Ok(Self::new(
            selectors,
            BlockMarkers::default(),
            settings.max_body_chars,
        ))
    }

    pub fn extract(&self, source_url: &str, raw: &str) -> ArticleRecord {
        // 1. Challenge pages often come back as 200, so check the text first
        if self.markers.is_soft_blocked(raw) {
            debug!(url = %source_url, "soft block markers present");
            return ArticleRecord::blocked(source_url);
        }

        // 2. Pull title and body by selector
        let article = reader::read(raw, &self.selectors);
        let title = article.title.unwrap_or_else(|| UNTITLED.to_string());

        // 3. Bound the body before it goes anywhere near a prompt
        match article.body {
            Some(body) => {
                ArticleRecord::ok(source_url, title, truncate_chars(&body, self.max_body_chars))
            }
            None => ArticleRecord::no_content(source_url, title),
        }
    }

    /// Record for a fetch that never produced a page.
    pub fn failure(&self, source_url: &str, reason: &str) -> ArticleRecord {
        ArticleRecord::network_error(source_url, truncate_chars(reason, self.max_body_chars))
    }
}
