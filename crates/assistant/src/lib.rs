//! Client for the local sentence-transformer embedding service, plus the
//! similarity ranking that powers assistant project recommendations.
//!
//! The embedding service is a small sidecar process exposing `/embed` and
//! `/health` over HTTP. It embeds up to 100 texts per request into
//! 384-dimensional vectors, optionally L2-normalized.

pub mod client;
pub mod similarity;

pub use client::{EmbeddingClient, EmbeddingClientError, EmbeddingServiceHealth};
pub use similarity::rank_by_similarity;
