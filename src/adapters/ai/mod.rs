//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI chat-completions with tool calling
//! - `MockAIProvider` - Scripted mock for testing
//! - `UnconfiguredProvider` - Refuses every call; used when no API key is set

mod mock_provider;
mod openai_provider;
mod unconfigured_provider;

pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
pub use unconfigured_provider::UnconfiguredProvider;
