//! Core orchestration layer: the dashboard aggregator (C3) and action
//! dispatcher (C4). Provider selection for the LLM client (C7) lives in
//! `adapters::llm` since it is a thin strategy choice over HTTP backends
//! rather than a stateful engine.

pub mod aggregate;
pub mod dispatch;
