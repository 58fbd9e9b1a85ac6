use crate::domain::{ConversationTurn, Transcript};

/// Projects the whole transcript to text, one block per turn, oldest first.
pub fn render(transcript: &Transcript) -> String {
    transcript
        .iter()
        .map(render_turn)
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn render_turn(turn: &ConversationTurn) -> String {
    format!("{}: {}", turn.role().as_str(), turn.content())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_every_turn_in_order() {
        let mut transcript = Transcript::new("Hello!");
        transcript.push_user("Any remote roles?");
        transcript.push_assistant("Yes, two.");

        assert_eq!(
            render(&transcript),
            "Assistant: Hello!\n\nUser: Any remote roles?\n\nAssistant: Yes, two."
        );
    }

    #[test]
    fn test_render_does_not_truncate() {
        let long_answer = "x".repeat(10_000);
        let mut transcript = Transcript::new("Hello!");
        transcript.push_user("q");
        transcript.push_assistant(long_answer.clone());

        assert!(render(&transcript).ends_with(&long_answer));
    }
}
