//! Parsing model output into reasoning decisions.

/// What the model decided to do in one reasoning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    /// Invoke a named tool with the given input
    ToolCall { name: String, input: String },

    /// The final answer to return to the caller
    Final(String),
}

/// Parse one model completion into a decision.
///
/// Recognizes the `Action:` / `Action Input:` pair and the `Final Answer:`
/// marker. When both appear, the tool call wins; the answer can re-emerge on
/// the next iteration. A completion matching neither shape (including an
/// `Action:` with no `Action Input:`) is treated as a final answer verbatim,
/// never a parse failure.
pub fn parse_decision(text: &str) -> AgentDecision {
    if let Some((name, input)) = parse_action(text) {
        return AgentDecision::ToolCall { name, input };
    }

    if let Some((_, answer)) = text.split_once("Final Answer:") {
        return AgentDecision::Final(answer.trim().to_string());
    }

    AgentDecision::Final(text.trim().to_string())
}

/// The model's reasoning text preceding its decision, if it emitted one.
pub fn extract_thought(text: &str) -> Option<String> {
    let (_, after) = text.split_once("Thought:")?;

    let end = after
        .find("Action:")
        .or_else(|| after.find("Final Answer:"))
        .unwrap_or(after.len());

    let thought = after[..end].trim();
    if thought.is_empty() {
        None
    } else {
        Some(thought.to_string())
    }
}

fn parse_action(text: &str) -> Option<(String, String)> {
    let lines: Vec<&str> = text.lines().collect();

    let action_idx = lines
        .iter()
        .position(|line| line.trim_start().starts_with("Action:"))?;

    let name = lines[action_idx]
        .trim_start()
        .strip_prefix("Action:")?
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }

    // The input may span multiple lines, ending at the next protocol marker
    let mut pieces = Vec::new();
    let mut found_input = false;

    for line in &lines[action_idx + 1..] {
        let trimmed = line.trim_start();

        if !found_input {
            if let Some(rest) = trimmed.strip_prefix("Action Input:") {
                found_input = true;
                pieces.push(rest);
            }
            continue;
        }

        if trimmed.starts_with("Observation:")
            || trimmed.starts_with("Final Answer:")
            || trimmed.starts_with("Thought:")
        {
            break;
        }

        pieces.push(line);
    }

    if !found_input {
        return None;
    }

    Some((name, pieces.join("\n").trim().to_string()))
}
