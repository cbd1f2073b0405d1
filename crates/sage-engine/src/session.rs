//! Per-session interaction state and its transitions.
//!
//! A session is owned by a single logical actor: every transition runs to
//! completion before the next is accepted, so no internal synchronization is
//! needed. The presentation layer calls these methods in response to user
//! events and renders the resulting state; it never mutates fields directly.

use sage_core::{ChatMessage, Flashcard, FlashcardScore, TextGenerator};
use sage_index::{EmbeddingProvider, SemanticIndex};
use tracing::debug;

use crate::prompt::DEFAULT_LANGUAGE;
use crate::{flashcards, retrieval};

/// Which interaction mode the session is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// No mode selected yet; the mode menu is showing.
    #[default]
    Menu,
    /// Question-answering over the corpus.
    Chat,
    /// Flashcard quizzing.
    Flashcards,
}

/// What happened to the cursor after grading a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOutcome {
    /// Moved on to the next card.
    Advanced,
    /// The graded card was the last one; the deck stays up until regenerated.
    DeckExhausted,
}

/// All mutable state of one user session.
#[derive(Debug, Default)]
pub struct Session {
    mode: Mode,
    transcript: Vec<ChatMessage>,
    deck: Vec<Flashcard>,
    cursor: usize,
    revealed: bool,
    score: FlashcardScore,
    language: String,
}

impl Session {
    /// Creates a fresh session in the menu, with the default language.
    pub fn new() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_owned(),
            ..Self::default()
        }
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Chat transcript, oldest first.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    /// The active flashcard deck.
    pub fn deck(&self) -> &[Flashcard] {
        &self.deck
    }

    /// Index of the current card. Meaningless while the deck is empty.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the current card's answer is shown.
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Running score tally.
    pub fn score(&self) -> FlashcardScore {
        self.score
    }

    /// The card under the cursor, if any.
    pub fn current_card(&self) -> Option<&Flashcard> {
        self.deck.get(self.cursor)
    }

    /// Language code responses are requested in.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Sets the response language.
    pub fn set_language<T: Into<String>>(&mut self, code: T) {
        self.language = code.into();
    }

    /// Enters chat mode.
    pub fn select_chat(&mut self) {
        self.mode = Mode::Chat;
    }

    /// Enters flashcard mode.
    pub fn select_flashcards(&mut self) {
        self.mode = Mode::Flashcards;
    }

    /// Returns to the mode menu. The transcript and deck persist.
    pub fn back_to_menu(&mut self) {
        self.mode = Mode::Menu;
    }

    /// Submits a chat query: appends the user message, answers it from the
    /// corpus, appends the assistant message, and returns the reply.
    ///
    /// The answer flow is fail-soft, so the transcript always gains exactly
    /// one user and one assistant message per call.
    pub async fn submit<E, G>(
        &mut self,
        query: &str,
        index: &SemanticIndex<E>,
        generator: &G,
    ) -> String
    where
        E: EmbeddingProvider,
        G: TextGenerator + ?Sized,
    {
        self.transcript.push(ChatMessage::user(query));

        let reply = retrieval::answer(query, index, generator, &self.language).await;
        self.transcript.push(ChatMessage::assistant(reply.clone()));

        reply
    }

    /// Replaces the deck with freshly generated cards, rewinding the cursor
    /// and hiding the answer. Returns a notice when generation degraded.
    pub async fn regenerate_deck<E, G>(
        &mut self,
        count: usize,
        index: &SemanticIndex<E>,
        generator: &G,
    ) -> Option<String>
    where
        E: EmbeddingProvider,
        G: TextGenerator + ?Sized,
    {
        let result = flashcards::generate(index, count, generator, &self.language).await;
        debug!("Regenerated deck with {} cards", result.cards.len());

        self.deck = result.cards;
        self.cursor = 0;
        self.revealed = false;

        result.notice
    }

    /// Shows the current card's answer. No-op without a deck or when the
    /// answer is already showing.
    pub fn reveal(&mut self) {
        if !self.deck.is_empty() {
            self.revealed = true;
        }
    }

    /// Grades the current card and advances.
    ///
    /// Returns `None` when there is no deck to grade. The score only grows
    /// here; the sole way back down is [`Session::reset_score`].
    pub fn grade(&mut self, correct: bool) -> Option<GradeOutcome> {
        if self.deck.is_empty() {
            return None;
        }

        self.score.record(correct);

        if self.cursor < self.deck.len() - 1 {
            self.cursor += 1;
            self.revealed = false;
            Some(GradeOutcome::Advanced)
        } else {
            Some(GradeOutcome::DeckExhausted)
        }
    }

    /// Moves to the next card; no-op on the last card.
    pub fn next_card(&mut self) {
        if !self.deck.is_empty() && self.cursor < self.deck.len() - 1 {
            self.cursor += 1;
            self.revealed = false;
        }
    }

    /// Moves to the previous card; no-op on the first card.
    pub fn prev_card(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.revealed = false;
        }
    }

    /// Clears the chat transcript.
    pub fn reset_history(&mut self) {
        self.transcript.clear();
    }

    /// Zeroes the score tally.
    pub fn reset_score(&mut self) {
        self.score.reset();
    }
}
