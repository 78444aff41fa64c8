//! Analysis handlers.

mod generate_analysis;

pub use generate_analysis::{
    GenerateAnalysisCommand, GenerateAnalysisError, GenerateAnalysisHandler,
    GenerateAnalysisResult,
};
