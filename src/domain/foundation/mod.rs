//! Foundation - shared primitives used across the domain.

mod ids;
mod state_machine;
mod timestamp;

pub use ids::SessionId;
pub use state_machine::{StateMachine, TransitionError};
pub use timestamp::Timestamp;
