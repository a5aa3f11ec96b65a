pub mod bridge;
pub mod gemini;
pub mod openai;
pub mod provider;
pub mod retry;
pub mod types;

pub use bridge::{BlockingModel, STOP_SEQUENCES};
pub use gemini::{GeminiConfig, GeminiProvider};
pub use openai::{OpenAIConfig, OpenAIProvider};
pub use provider::LLMProvider;
pub use retry::RetryConfig;
pub use types::*;
