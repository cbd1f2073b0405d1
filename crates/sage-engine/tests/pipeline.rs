//! End-to-end pipeline tests: a session driven through both modes against an
//! in-memory corpus and a mock generator.

use sage_core::Result;
use sage_engine::{GradeOutcome, Mode, Session};
use sage_index::{CorpusArtifacts, DocumentChunk, EmbeddingProvider, SemanticIndex, VectorStore};
use sage_providers::MockGenerator;

/// Deterministic hash-based embedder, matching chunks to identical queries.
struct FakeEmbedder;

impl EmbeddingProvider for FakeEmbedder {
    async fn ensure_model_available(&self) -> Result<()> {
        Ok(())
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(fake_embedding(text))
    }
}

fn fake_embedding(text: &str) -> Vec<f32> {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash as _, Hasher as _};

    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    let hash = hasher.finish();

    (0..16)
        .map(|idx| ((hash.wrapping_add(idx)) % 1000) as f32 / 1000.0)
        .collect()
}

fn corpus(contents: &[&str]) -> SemanticIndex<FakeEmbedder> {
    let artifacts = CorpusArtifacts {
        chunks: contents
            .iter()
            .map(|content| DocumentChunk::new(*content))
            .collect(),
        embeddings: contents
            .iter()
            .map(|content| fake_embedding(content))
            .collect(),
    };
    let store = VectorStore::from_artifacts(artifacts).expect("consistent artifacts");
    SemanticIndex::new(store, FakeEmbedder)
}

#[tokio::test]
async fn chat_then_flashcards_full_session() {
    let index = corpus(&[
        "The prover generates a receipt.",
        "The verifier checks the receipt.",
        "Proving happens off-chain.",
        "Verification is cheap on-chain.",
    ]);

    let generator = MockGenerator::new()
        .with_response("User Question", "Receipts are proofs of execution.")
        .with_response(
            "flashcards",
            r#"[{"question":"Who makes receipts?","answer":"The prover."},
                {"question":"Who checks them?","answer":"The verifier."}]"#,
        );

    let mut session = Session::new();

    // Chat round trip.
    session.select_chat();
    let reply = session
        .submit("The prover generates a receipt.", &index, &generator)
        .await;
    assert_eq!(reply, "Receipts are proofs of execution.");
    assert_eq!(session.transcript().len(), 2);

    // Back to the menu keeps the transcript.
    session.back_to_menu();
    assert_eq!(session.mode(), Mode::Menu);
    assert_eq!(session.transcript().len(), 2);

    // Flashcard round: generate, work through the deck.
    session.select_flashcards();
    let notice = session.regenerate_deck(2, &index, &generator).await;
    assert!(notice.is_none());
    assert_eq!(session.deck().len(), 2);

    session.reveal();
    assert_eq!(session.grade(true), Some(GradeOutcome::Advanced));

    session.reveal();
    assert_eq!(session.grade(false), Some(GradeOutcome::DeckExhausted));

    let score = session.score();
    assert_eq!(score.correct, 1);
    assert_eq!(score.total, 2);
    assert_eq!(score.accuracy(), Some(50));

    // Two generation calls total: one answer, one deck.
    assert_eq!(generator.call_count(), 2);
}

#[tokio::test]
async fn generation_failures_leave_the_session_usable() {
    let index = corpus(&["only fact"]);
    let generator = MockGenerator::new().with_failure("upstream timeout");

    let mut session = Session::new();
    session.select_chat();

    let reply = session.submit("only fact", &index, &generator).await;
    assert!(reply.contains("upstream timeout"));

    // The failed exchange is still recorded and later transitions work.
    assert_eq!(session.transcript().len(), 2);
    session.back_to_menu();
    session.select_flashcards();
    let notice = session.regenerate_deck(3, &index, &generator).await;
    assert!(notice.is_some());
    assert!(session.deck().is_empty());
}
