//! Caching subsystem.
//!
//! - [`AnalysisCache`]: permanent, file-backed map from normalized URL to
//!   analysis text. Consulted by the [`Analyzer`](crate::Analyzer) before
//!   any provider call; see [`analysis`] for persistence and concurrency
//!   semantics.

pub mod analysis;

pub use analysis::{AnalysisCache, CacheLookup, DEFAULT_CACHE_FILE};
