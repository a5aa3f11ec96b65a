//! Agent engine: the `ReAct` loop, its state machine and builder.

pub mod builder;
pub mod cancel;
pub mod react_loop;
pub mod state;
pub mod transcript;

pub use builder::AgentEngineBuilder;
pub use cancel::CancellationToken;
pub use react_loop::AgentEngine;
pub use state::{LoopState, RunReport};
pub use transcript::Transcript;
