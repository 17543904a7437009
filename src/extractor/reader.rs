use scraper::{ElementRef, Html, Selector};

/// Compiled title and body selectors for the target platform's markup.
#[derive(Debug, Clone)]
pub struct Selectors {
    title: Selector,
    body: Selector,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid selector '{selector}': {reason}")]
pub struct SelectorError {
    pub selector: String,
    pub reason: String,
}

impl Selectors {
    pub fn parse(title: &str, body: &str) -> Result<Self, SelectorError> {
        Ok(Self {
            title: compile(title)?,
            body: compile(body)?,
        })
    }
}

fn compile(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// What the selectors found on a page, before any policy is applied.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RawArticle {
    pub title: Option<String>,
    pub body: Option<String>,
}

pub fn read(html: &str, selectors: &Selectors) -> RawArticle {
    let document = Html::parse_document(html);

    let title = document
        .select(&selectors.title)
        .next()
        .map(|el| visible_text(el).concat())
        .filter(|t| !t.is_empty());

    let body = document
        .select(&selectors.body)
        .next()
        .map(|el| visible_text(el).join("\n"))
        .filter(|t| !t.is_empty());

    RawArticle { title, body }
}

/// Trimmed, non-empty text nodes under `root`, skipping script and style.
fn visible_text(root: ElementRef<'_>) -> Vec<String> {
    root.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != root.id())
                .filter_map(|ancestor| ancestor.value().as_element())
                .any(|el| matches!(el.name(), "script" | "style"));
            let trimmed = text.trim();
            (!hidden && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect()
}
