//! Analysis domain - the structured idea evaluation and the pure services
//! that clean, validate and correct it.
//!
//! # Components
//!
//! - `Analysis` - Typed model of one evaluation, serialized in camelCase
//! - `ResponseSanitizer` - Extracts a candidate JSON object from model text
//! - `StructuralValidator` - Schema rules over the untyped candidate
//! - `ConsistencyChecker` - Cross-field invariants with corrections
//!
//! Everything here is synchronous and free of I/O.

mod consistency;
pub mod currency;
mod model;
mod reports;
mod sanitizer;
mod validator;

pub use consistency::{
    ConsistencyChecker, CURRENCY_INCONSISTENCY, FORECAST_CUSTOMERS_INVERTED, FORECAST_INVERTED,
    FORECAST_MISORDERED, FORECAST_SHARE_INVERTED,
};
pub use model::{
    Analysis, ClientSegment, Competitor, ForecastCase, Forecasts, GoToMarket, MonetaryValue,
    PriceSuggestion, ScoreAnalysis, ScoreFactor, Source, Timeline, TimelinePhase, TrendPoint,
    DEFAULT_FORECAST_PERIOD, MAX_SUMMARY_CHARS, MAX_VALIDATION_SCORE, MIN_VALIDATION_SCORE,
    REQUIRED_SOURCE_COUNT,
};
pub use reports::{ConsistencyReport, ValidationReport};
pub use sanitizer::{ResponseSanitizer, SanitizeError, MAX_RESPONSE_LENGTH};
pub use validator::{StructuralIssue, StructuralValidator, ARRAY_FIELDS, REQUIRED_FIELDS};

#[cfg(test)]
pub(crate) use model::fixtures;
