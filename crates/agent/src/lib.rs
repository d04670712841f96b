//! Reasoning agent for doctalk: conversation memory, tools, and the
//! think → act → observe loop that answers questions over retrieved context.

pub mod decision;
pub mod engine;
pub mod memory;
pub mod prompt;
pub mod service;
pub mod tools;

#[cfg(test)]
mod tests;

pub use decision::AgentDecision;
pub use engine::{AgentStep, AgentTurn, ReasoningAgent};
pub use memory::{ConversationMemory, Role, Turn};
pub use service::AgentService;
pub use tools::{CalculatorTool, Tool, ToolRegistry};
