//! Keyword heuristics that sit in front of the search and LLM calls.

pub mod chat;
pub mod cost;
pub mod query;
pub mod relevance;
pub mod research;
