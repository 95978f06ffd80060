pub mod tantivy_utils;
pub mod index;
pub mod search;

pub use index::{TantivyIndexBuilder, TantivyLayerIndex};
pub use search::TantivyQueryEngine;
