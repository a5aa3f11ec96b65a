//! Mentor SDK - the tool-use orchestration loop behind the study assistant.
//!
//! A question is answered by repeatedly asking a language model what to do
//! next. The model either names a tool and its input, or gives a final
//! answer. Tool results are fed back as observations until the model is
//! done or a budget runs out.
//!
//! # Features
//!
//! - **Tool System**: Registry, action parser and panic-safe dispatcher
//! - **Agent Engine**: `ReAct` loop as an explicit state machine
//! - **Prompt Building**: Template rendering with tool catalog and transcript
//! - **Error Handling**: Structured error hierarchy using `thiserror`
//! - **Configuration**: Environment-based configuration with validation
//!
//! # Example
//!
//! ```rust
//! use mentor_sdk::{AgentConfig, AgentEngineBuilder, InferenceError, Question, ToolRegistry};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AgentConfig::builder()
//!     .max_iterations(10)
//!     .verbose(true)
//!     .build()?;
//!
//! let engine = AgentEngineBuilder::new()
//!     .tools(ToolRegistry::new())
//!     .config(config)
//!     .build()?;
//!
//! let model = |_prompt: &str| -> Result<String, InferenceError> {
//!     Ok("Thought: Tôi biết.\nFinal Answer: Hà Nội".to_string())
//! };
//!
//! let report = engine.run(&Question::new("q-1", "Thủ đô của Việt Nam là gì?"), &model);
//! assert_eq!(report.answer(), Some("Hà Nội"));
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod prompt;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use config::{AgentConfig, AgentConfigBuilder};
pub use engine::{
    AgentEngine, AgentEngineBuilder, CancellationToken, LoopState, RunReport, Transcript,
};
pub use error::{AgentError, InferenceError, ParseError, TaskError, ToolError};
pub use model::Model;
pub use prompt::PromptBuilder;
pub use tools::{
    ActionParser, PayloadError, Tool, ToolDispatcher, ToolRegistry, decode_payload,
    extract_json_object,
};
pub use types::{Action, Observation, ParsedOutput, Question, Step};

/// Version of the mentor SDK.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
