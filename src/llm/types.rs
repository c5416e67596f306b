//! What the assistant sends and gets back

use std::time::Duration;

/// Sampling temperature for README and release drafting
pub const DRAFT_TEMPERATURE: f32 = 0.3;

/// One single-turn generation: standing instructions plus the task text
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub instructions: String,
    pub task: String,
    pub temperature: f32,
}

impl Prompt {
    pub fn new(instructions: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
            task: task.into(),
            temperature: DRAFT_TEMPERATURE,
        }
    }
}

/// Raw model output, untrimmed
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_uses_draft_temperature() {
        let prompt = Prompt::new("Be brief", "Describe weather-cli");

        assert_eq!(prompt.instructions, "Be brief");
        assert_eq!(prompt.task, "Describe weather-cli");
        assert_eq!(prompt.temperature, DRAFT_TEMPERATURE);
    }
}
