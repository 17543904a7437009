pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::{ArticleClient, ArticleSource};
pub use errors::{ClientBuildError, FetchError};
pub use types::{Charset, PageResponse};
