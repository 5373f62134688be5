//! Document ingestion and hybrid retrieval.
//!
//! The pipeline: a tagged element stream is segmented into
//! section-rooted chunks, chunks are optionally embedded and upserted
//! into an OpenSearch index under deterministic ids, and queries run as
//! lexical, vector, or hybrid searches whose results are packed into a
//! bounded evidence context.

pub mod context;
pub mod element;
pub mod error;
pub mod indexer;
pub mod retriever;
pub mod segmenter;
pub mod store;

pub use element::{Element, ElementKind};
pub use error::{IndexError, Result};
pub use store::SearchResult;
