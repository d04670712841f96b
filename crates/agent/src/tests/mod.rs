//! Shared test doubles and end-to-end reasoning scenarios.


use doctalk_core::{AppError, AppResult};
use doctalk_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Backend double that replays a fixed script of completions and records
/// every prompt it receives. An exhausted script fails like an unreachable
/// backend.
pub(crate) struct ScriptedClient {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedClient {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.prompts.lock().unwrap().push(request.prompt.clone());

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Backend("connection refused".to_string()))?;

        Ok(LlmResponse {
            content: next,
            model: request.model.clone(),
            usage: LlmUsage::new(0, 0),
        })
    }
}
