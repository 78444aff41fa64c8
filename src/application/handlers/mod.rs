//! Application handlers.
//!
//! Command handlers that validate input and delegate to the orchestrator.

pub mod analysis;

pub use analysis::{
    GenerateAnalysisCommand, GenerateAnalysisError, GenerateAnalysisHandler,
    GenerateAnalysisResult,
};
