//! External tools used by the research agents.

/// Web search backends.
pub mod search;

pub use search::{DuckDuckGoSearch, SearchHit, WebSearch};
