pub mod bing;

pub use bing::{BingSearchResults, BingSearchTool, NO_RESULTS, SearchOutcome};
