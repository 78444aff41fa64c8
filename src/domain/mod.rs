//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, state machines)
//! - `analysis` - The analysis model and its sanitize/validate/correct services
//! - `session` - Per-request session state and attempt lifecycle

pub mod analysis;
pub mod foundation;
pub mod session;
