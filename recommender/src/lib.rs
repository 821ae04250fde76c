pub mod catalog;
pub mod keywords;
pub mod parser;
pub mod ranker;

pub use catalog::{load_catalog, Catalog, CatalogEntry};
pub use keywords::{Feature, Intent};
pub use parser::{classify, extract_brand, extract_budget, parse_query, ParsedQuery};
pub use ranker::{recommend, FallbackEntry, Outcome, ScoredEntry};
