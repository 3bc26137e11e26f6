//! AI Provider Adapters.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for testing
//! - `OpenAIProvider` - OpenAI-compatible chat completions
//! - `LlmAssistant` - Field extraction and text enhancement over any provider

mod llm_assistant;
mod mock_provider;
mod openai_provider;

pub use llm_assistant::{AssistantSettings, LlmAssistant};
pub use mock_provider::{MockAIProvider, MockError, MockResponse, DEFAULT_MOCK_CONTENT};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEFAULT_BASE_URL, DEFAULT_MODEL};
