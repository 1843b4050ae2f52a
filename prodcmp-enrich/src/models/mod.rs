//! Data model: input records, candidate items, output records

pub mod candidate;
pub mod input;
pub mod report;

pub use candidate::{Candidate, ExpressProduct, HunterProduct, ReviewTarget, DEFAULT_REVIEW_COUNT};
pub use input::{InputDocument, Product, ProductItem, RecordId, Shop, ShopGroup, SuggestionProduct};
pub use report::ComparisonReport;
