pub mod bing;

pub use bing::{BingSearchClient, create_search_client};
