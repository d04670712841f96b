//! The iterative reasoning loop.

use crate::decision::{self, AgentDecision};
use crate::memory::{ConversationMemory, Role};
use crate::prompt;
use crate::tools::ToolRegistry;
use doctalk_core::{AppError, AppResult};
use doctalk_llm::{LlmClient, LlmRequest};
use serde::Serialize;
use std::sync::Arc;

/// One think/act/observe step of a reasoning loop.
#[derive(Debug, Clone, Serialize)]
pub struct AgentStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,

    pub action: String,
    pub input: String,
    pub observation: String,
}

/// Record of one reasoning-loop execution, returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct AgentTurn {
    pub question: String,
    pub steps: Vec<AgentStep>,
    pub answer: String,
    pub iterations: usize,
}

/// Drives the think → act → observe loop against the model backend.
///
/// Completions run at temperature zero. Tool failures and unknown tool names
/// become observations the model sees on the next iteration; backend
/// failures propagate to the caller unchanged.
pub struct ReasoningAgent {
    client: Arc<dyn LlmClient>,
    model: String,
    max_iterations: usize,
}

impl ReasoningAgent {
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>, max_iterations: usize) -> Self {
        Self {
            client,
            model: model.into(),
            max_iterations,
        }
    }

    /// Answer a question against retrieved context, with tool access.
    ///
    /// On success the question/answer pair is appended to `memory`. Budget
    /// exhaustion and backend failures leave the memory untouched.
    pub async fn run(
        &self,
        question: &str,
        context: &str,
        tools: &ToolRegistry,
        memory: &ConversationMemory,
    ) -> AppResult<AgentTurn> {
        let history = prompt::render_history(&memory.as_context());
        let mut transcript =
            prompt::render_reasoning_prompt(&tools.describe_all(), context, &history, question)?;

        let mut steps = Vec::new();

        for iteration in 1..=self.max_iterations {
            tracing::debug!("Reasoning iteration {}/{}", iteration, self.max_iterations);

            let request = LlmRequest::new(&transcript, &self.model).with_temperature(0.0);
            let response = self.client.complete(&request).await?;
            let text = response.content;

            match decision::parse_decision(&text) {
                AgentDecision::ToolCall { name, input } => {
                    let observation = match tools.resolve(&name) {
                        Ok(tool) => match tool.invoke(&input) {
                            Ok(output) => output,
                            Err(e) => e.to_string(),
                        },
                        Err(e) => e.to_string(),
                    };

                    tracing::debug!("Tool '{}' observed: {}", name, observation);

                    transcript.push_str(&format!(
                        "\n{}\nObservation: {}\n",
                        text.trim(),
                        observation
                    ));

                    steps.push(AgentStep {
                        thought: decision::extract_thought(&text),
                        action: name,
                        input,
                        observation,
                    });
                }
                AgentDecision::Final(answer) => {
                    memory.append(Role::User, question);
                    memory.append(Role::Agent, answer.clone());

                    tracing::info!("Reasoning finished after {} iteration(s)", iteration);

                    return Ok(AgentTurn {
                        question: question.to_string(),
                        steps,
                        answer,
                        iterations: iteration,
                    });
                }
            }
        }

        Err(AppError::BudgetExhausted(self.max_iterations))
    }
}
