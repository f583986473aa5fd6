//! Local code-intelligence engine: structural extraction, cross-file call
//! graphs, and embedding-backed semantic search over a source tree.
//!
//! The pieces are meant to be used through [`pipeline::Indexer`] and
//! [`search::Searcher`]; every other module is a focused component that can
//! also be exercised standalone (see each module's tests).

pub mod cache;
pub mod callgraph;
pub mod config;
pub mod daemon;
pub mod dirty;
pub mod embed;
pub mod embedtext;
pub mod error;
pub mod extractor;
pub mod language;
pub mod metadata;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod search;
pub mod unit;
pub mod vectorindex;
pub mod walk;

pub use error::{CoreError, CoreResult};
pub use pipeline::{IndexReport, Indexer};
