//! External collaborators: web search, URL classification, and the
//! conditional enrichment extractors.

pub mod arxiv;
pub mod link;
pub mod tavily;
pub mod wikipedia;

pub use arxiv::{ArxivClient, PaperExtractor};
pub use link::{arxiv_id, classify, wikipedia_title};
pub use tavily::{SearchProvider, TavilyClient};
pub use wikipedia::{ArticleExtractor, WikipediaClient};
