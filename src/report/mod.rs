pub mod composer;
pub mod errors;
pub mod gemini;
pub mod prompt;

pub use composer::{ReportComposer, ReportResult};
pub use errors::GenerationError;
pub use gemini::{GeminiClient, TextGenerator};
pub use prompt::{ARTICLE_SEPARATOR, build_prompt, join_articles};
