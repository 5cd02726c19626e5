//! High-level database API. Encapsulates the SQL and data-access patterns so
//! the HTTP handlers work with domain types instead of queries: the scoring
//! write path, the history aggregation read path and the CSV export read
//! path each live in their own sub-module.

pub mod export_service;
pub mod history_service;
pub mod scoring_service;
