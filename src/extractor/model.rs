use serde::{Deserialize, Serialize};

/// Title used when the page has none we can find.
pub const UNTITLED: &str = "无标题";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Ok,
    /// The site answered with an anti-automation challenge page.
    Blocked,
    NetworkError,
    /// The page loaded but the body container was missing or empty.
    NoContent,
}

/// Outcome of one fetch attempt for one link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub source_url: String,
    pub title: String,
    pub body_text: String,
    pub status: FetchStatus,
}

impl ArticleRecord {
    pub fn ok(source_url: impl Into<String>, title: impl Into<String>, body_text: String) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            body_text,
            status: FetchStatus::Ok,
        }
    }

    pub fn no_content(source_url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: title.into(),
            body_text: String::new(),
            status: FetchStatus::NoContent,
        }
    }

    pub fn blocked(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: UNTITLED.to_string(),
            body_text: String::new(),
            status: FetchStatus::Blocked,
        }
    }

    /// `reason` is kept as the body so it shows up inline in the report input.
    pub fn network_error(source_url: impl Into<String>, reason: String) -> Self {
        Self {
            source_url: source_url.into(),
            title: UNTITLED.to_string(),
            body_text: reason,
            status: FetchStatus::NetworkError,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }

    /// Text block for this article as it appears in the prompt.
    pub fn render(&self) -> String {
        match self.status {
            FetchStatus::Ok => format!("【标题】：{}\n【内容】：{}\n", self.title, self.body_text),
            FetchStatus::NoContent => format!("【标题】：{}\n（未抓取到正文）\n", self.title),
            FetchStatus::Blocked => format!("❌ 抓取失败 {}: 触发了安全验证\n", self.source_url),
            FetchStatus::NetworkError => {
                format!("❌ 抓取失败 {}: {}\n", self.source_url, self.body_text)
            }
        }
    }
}

/// Cut `text` down to at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
