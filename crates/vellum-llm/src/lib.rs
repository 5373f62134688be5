//! Embedding and chat provider abstraction.
//!
//! The rest of the workspace talks to language-model services only
//! through the [`LlmProvider`] trait: batch embeddings for document
//! chunks, single embeddings for queries, and chat completion for
//! answer generation. The Azure OpenAI backend is the production
//! implementation; a scripted mock is available behind the `mock`
//! feature for pipeline tests.

pub mod azure;
pub mod error;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;

pub use error::LlmError;
pub use provider::LlmProvider;
