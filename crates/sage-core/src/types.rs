use serde::{Deserialize, Serialize};

/// Role of a chat transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message written by the user.
    User,
    /// Message produced by the assistant.
    Assistant,
}

/// A single entry in a session's chat transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: Role,
    /// Textual content of the message.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user<T: Into<String>>(content: T) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant<T: Into<String>>(content: T) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A question/answer pair generated from the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// The prompt side of the card.
    pub question: String,
    /// The answer side of the card.
    pub answer: String,
}

/// Running tally of graded flashcard answers.
///
/// Counts only grow; the sole way back to zero is [`FlashcardScore::reset`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardScore {
    /// Number of cards graded as correct.
    pub correct: u32,
    /// Number of cards graded in total.
    pub total: u32,
}

impl FlashcardScore {
    /// Records one graded card.
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Zeroes the tally.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rounded percentage of correct answers, or `None` before any grading.
    pub fn accuracy(&self) -> Option<u32> {
        if self.total == 0 {
            return None;
        }
        let percent = f64::from(self.correct) / f64::from(self.total) * 100.0;
        Some(percent.round() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Assistant).expect("serialize role");
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_flashcard_deserializes_from_generator_json() {
        let json = r#"{"question": "What is a proof?", "answer": "A verifiable claim."}"#;
        let card: Flashcard = serde_json::from_str(json).expect("deserialize flashcard");
        assert_eq!(card.question, "What is a proof?");
        assert_eq!(card.answer, "A verifiable claim.");
    }

    #[test]
    fn test_score_record() {
        let mut score = FlashcardScore::default();
        score.record(true);
        assert_eq!(score, FlashcardScore { correct: 1, total: 1 });

        let mut score = FlashcardScore::default();
        score.record(false);
        assert_eq!(score, FlashcardScore { correct: 0, total: 1 });
    }

    #[test]
    fn test_score_reset() {
        let mut score = FlashcardScore { correct: 3, total: 5 };
        score.reset();
        assert_eq!(score, FlashcardScore::default());
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(FlashcardScore::default().accuracy(), None);
        assert_eq!(FlashcardScore { correct: 2, total: 3 }.accuracy(), Some(67));
        assert_eq!(FlashcardScore { correct: 5, total: 5 }.accuracy(), Some(100));
    }
}
