//! Rendering of the reasoning prompt submitted to the model backend.

use crate::memory::Turn;
use doctalk_core::{AppError, AppResult};
use handlebars::Handlebars;
use serde_json::json;

/// Template for the initial reasoning prompt.
///
/// The response protocol follows the ReAct convention: the model either
/// requests a tool via `Action:` / `Action Input:` or finishes with
/// `Final Answer:`.
const REASONING_TEMPLATE: &str = "\
You are a helpful AI assistant. Answer the user's question using the provided
document context. If the question requires calculation, use a tool.

You have access to the following tools:
{{#each tools}}
{{this.name}}: {{this.description}}
{{/each}}

Use this format:

Thought: reason about what to do next
Action: the tool to use, one of [{{toolNames}}]
Action Input: the input for the tool
Observation: the tool result
... (Thought/Action/Action Input/Observation may repeat)
Thought: I can now answer the question
Final Answer: the answer

If no tool is needed, reply with the Final Answer directly.

Context from documents:
{{context}}

{{#if history}}
Previous conversation:
{{history}}

{{/if}}
Question: {{question}}
";

/// Render the initial reasoning prompt.
pub fn render_reasoning_prompt(
    tools: &[(String, String)],
    context: &str,
    history: &str,
    question: &str,
) -> AppResult<String> {
    let tool_entries: Vec<serde_json::Value> = tools
        .iter()
        .map(|(name, description)| json!({ "name": name, "description": description }))
        .collect();

    let tool_names = tools
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let data = json!({
        "tools": tool_entries,
        "toolNames": tool_names,
        "context": context,
        "history": history,
        "question": question,
    });

    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("reasoning", REASONING_TEMPLATE)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    handlebars
        .render("reasoning", &data)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Render prior conversation turns for inclusion in the prompt.
pub fn render_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role, turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ConversationMemory, Role};

    fn sample_tools() -> Vec<(String, String)> {
        vec![(
            "calculator".to_string(),
            "Performs arithmetic".to_string(),
        )]
    }

    #[test]
    fn test_render_includes_all_sections() {
        let prompt = render_reasoning_prompt(
            &sample_tools(),
            "Paris is the capital of France.",
            "User: hello\nAgent: hi",
            "What is the capital of France?",
        )
        .unwrap();

        assert!(prompt.contains("calculator: Performs arithmetic"));
        assert!(prompt.contains("one of [calculator]"));
        assert!(prompt.contains("Paris is the capital of France."));
        assert!(prompt.contains("Previous conversation:\nUser: hello\nAgent: hi"));
        assert!(prompt.contains("Question: What is the capital of France?"));
        assert!(prompt.contains("Final Answer:"));
    }

    #[test]
    fn test_render_omits_empty_history() {
        let prompt = render_reasoning_prompt(&sample_tools(), "context", "", "question").unwrap();
        assert!(!prompt.contains("Previous conversation:"));
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let prompt =
            render_reasoning_prompt(&sample_tools(), "a < b && b > c", "", "compare").unwrap();
        assert!(prompt.contains("a < b && b > c"));
    }

    #[test]
    fn test_render_history_format() {
        let memory = ConversationMemory::default();
        memory.append(Role::User, "What is 2 + 2?");
        memory.append(Role::Agent, "4");

        let history = render_history(&memory.as_context());
        assert_eq!(history, "User: What is 2 + 2?\nAgent: 4");
    }

    #[test]
    fn test_render_history_empty() {
        assert_eq!(render_history(&[]), "");
    }
}
