//! Prompt assembly: renders stored history plus the new input into the
//! single prompt string sent to the model.

use palaver_types::turn::{ChatTurn, TurnRole};

/// Placeholder replaced with the rendered conversation history.
pub const CHAT_HISTORY_VAR: &str = "{chat_history}";
/// Placeholder replaced with the user's new input.
pub const HUMAN_INPUT_VAR: &str = "{human_input}";

const DEFAULT_TEMPLATE: &str = "{chat_history}\n{human_input}";

/// A prompt template with `{chat_history}` and `{human_input}` slots.
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Render `turns` as labeled transcript lines, oldest first.
    pub fn render_history(turns: &[ChatTurn]) -> String {
        turns
            .iter()
            .map(|turn| {
                let label = match turn.role {
                    TurnRole::Human => "Human",
                    TurnRole::Ai => "AI",
                };
                format!("{label}: {}", turn.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Fill both slots and return the complete prompt.
    pub fn render(&self, turns: &[ChatTurn], human_input: &str) -> String {
        self.template
            .replace(CHAT_HISTORY_VAR, &Self::render_history(turns))
            .replace(HUMAN_INPUT_VAR, human_input)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_history_labels_both_roles() {
        let turns = vec![ChatTurn::human("Hello"), ChatTurn::ai("Hi there")];
        assert_eq!(
            PromptTemplate::render_history(&turns),
            "Human: Hello\nAI: Hi there"
        );
    }

    #[test]
    fn test_render_fills_both_slots() {
        let turns = vec![ChatTurn::human("Hello"), ChatTurn::ai("Hi there")];
        let prompt = PromptTemplate::default().render(&turns, "How are you?");
        assert_eq!(prompt, "Human: Hello\nAI: Hi there\nHow are you?");
    }

    #[test]
    fn test_render_with_empty_history_keeps_leading_newline() {
        // With no history the default template still separates the (empty)
        // history slot from the input with a newline.
        let prompt = PromptTemplate::default().render(&[], "First question");
        assert_eq!(prompt, "\nFirst question");
    }

    #[test]
    fn test_custom_template() {
        let template = PromptTemplate::new("Context:\n{chat_history}\n\nQ: {human_input}\nA:");
        let prompt = template.render(&[ChatTurn::ai("earlier answer")], "next?");
        assert_eq!(prompt, "Context:\nAI: earlier answer\n\nQ: next?\nA:");
    }
}
