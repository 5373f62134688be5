//! Core wiring for the vellum document QA system: configuration
//! loading, the built-in requirement catalog, and the question-answer
//! pipeline that ties retrieval to answer generation.

pub mod catalog;
pub mod config;
pub mod pipeline;

pub use catalog::{Catalog, CatalogSection};
pub use config::Config;
pub use pipeline::{Answer, RagPipeline};
