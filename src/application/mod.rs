//! Application layer - orchestration and command handlers.
//!
//! Coordinates the domain steps and the ports; holds no I/O of its own.

pub mod handlers;
pub mod orchestration;

pub use handlers::{
    GenerateAnalysisCommand, GenerateAnalysisError, GenerateAnalysisHandler,
    GenerateAnalysisResult,
};
pub use orchestration::{
    AnalysisOrchestrator, AnalysisOutcome, ModelSelection, OrchestrationError,
    OrchestratorSettings,
};
