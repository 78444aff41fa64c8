//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - Model providers (OpenAI, Anthropic, scripted mock)
//! - `http` - axum relay exposing the orchestrator
//! - `storage` - In-memory session store

pub mod ai;
pub mod http;
pub mod storage;

pub use ai::{AnthropicProvider, MockAIProvider, OpenAIProvider};
pub use storage::InMemorySessionStore;
