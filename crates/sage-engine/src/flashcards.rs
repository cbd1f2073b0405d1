//! Flashcard generation from whole-corpus samples.
//!
//! Unlike the answer flow, flashcards are not query-targeted: chunks are
//! sampled uniformly from the entire corpus, oversampled for topical variety,
//! and condensed by the generator into question/answer pairs under a JSON
//! schema contract.

use rand::seq::SliceRandom as _;
use sage_core::{Flashcard, GenerationRequest, ResponseSchema, Result, TextGenerator};
use sage_index::{DocumentChunk, EmbeddingProvider, SemanticIndex};
use tracing::{debug, warn};

use crate::prompt;

/// Outcome of a flashcard generation attempt.
///
/// The card list is empty when the corpus has no chunks or when generation
/// degraded; in the latter case `notice` carries the user-facing detail.
#[derive(Debug, Clone, Default)]
pub struct DeckResult {
    /// The generated deck, in generator order.
    pub cards: Vec<Flashcard>,
    /// User-facing notice when generation or parsing degraded.
    pub notice: Option<String>,
}

/// Generates a deck of up to `count` flashcards from the corpus.
///
/// Same fail-soft contract as the answer flow: errors become an empty deck
/// plus a notice, never a propagated failure.
pub async fn generate<E, G>(
    index: &SemanticIndex<E>,
    count: usize,
    generator: &G,
    language: &str,
) -> DeckResult
where
    E: EmbeddingProvider,
    G: TextGenerator + ?Sized,
{
    match try_generate(index, count, generator, language).await {
        Ok(result) => result,
        Err(error) => {
            warn!("Flashcard generation failed: {error}");
            DeckResult {
                cards: Vec::new(),
                notice: Some(format!("Error generating flashcards: {error}")),
            }
        }
    }
}

/// Fallible core of [`generate`].
async fn try_generate<E, G>(
    index: &SemanticIndex<E>,
    count: usize,
    generator: &G,
    language: &str,
) -> Result<DeckResult>
where
    E: EmbeddingProvider,
    G: TextGenerator + ?Sized,
{
    let (sampled, effective_count) = sample_chunks(index.chunks(), count);
    if sampled.is_empty() {
        return Ok(DeckResult::default());
    }

    debug!(
        "Sampled {} chunks for a deck of {effective_count}",
        sampled.len()
    );

    let context = prompt::join_sampled(sampled.iter().map(|chunk| chunk.content.as_str()));
    let deck_prompt = prompt::flashcard_prompt(&context, effective_count, language);
    let request = GenerationRequest::new(deck_prompt).with_schema(ResponseSchema::flashcards())?;

    let raw = generator.generate(&request).await?;

    match serde_json::from_str::<Vec<Flashcard>>(&raw) {
        Ok(cards) => Ok(DeckResult {
            cards,
            notice: None,
        }),
        Err(error) => Ok(DeckResult {
            cards: Vec::new(),
            notice: Some(format!("Failed to parse flashcard response: {error}")),
        }),
    }
}

/// Draws the context sample for a deck of up to `count` cards.
///
/// Returns the sampled chunks and the effective card count. The corpus may
/// be smaller than the deck asks for: fewer chunks than `count` uses every
/// chunk and shrinks the deck to match, and the 2x oversample for topical
/// variety is likewise bounded by the inventory.
fn sample_chunks(chunks: &[DocumentChunk], count: usize) -> (Vec<&DocumentChunk>, usize) {
    if chunks.is_empty() || count == 0 {
        return (Vec::new(), 0);
    }

    let effective_count = count.min(chunks.len());
    let sample_size = (effective_count * 2).min(chunks.len());

    let mut rng = rand::thread_rng();
    let sampled: Vec<&DocumentChunk> = chunks.choose_multiple(&mut rng, sample_size).collect();

    (sampled, effective_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::index_of;
    use sage_providers::MockGenerator;
    use std::collections::HashSet;

    fn deck_json(cards: &[(&str, &str)]) -> String {
        let values: Vec<serde_json::Value> = cards
            .iter()
            .map(|(question, answer)| {
                serde_json::json!({ "question": question, "answer": answer })
            })
            .collect();
        serde_json::Value::Array(values).to_string()
    }

    #[test]
    fn test_sample_exactly_double_when_inventory_allows() {
        let contents: Vec<String> = (0..12).map(|idx| format!("chunk {idx}")).collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let index = index_of(&refs);

        let (sampled, effective_count) = sample_chunks(index.chunks(), 5);
        assert_eq!(effective_count, 5);
        assert_eq!(sampled.len(), 10);

        let distinct: HashSet<&str> = sampled.iter().map(|chunk| chunk.content.as_str()).collect();
        assert_eq!(distinct.len(), 10, "sample must be without replacement");
    }

    #[test]
    fn test_sample_clamps_to_small_inventory() {
        let index = index_of(&["a", "b", "c"]);

        let (sampled, effective_count) = sample_chunks(index.chunks(), 5);
        assert_eq!(effective_count, 3);
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn test_sample_mid_range_inventory_does_not_overdraw() {
        // 7 chunks, deck of 5: a full 2x oversample would need 10.
        let contents: Vec<String> = (0..7).map(|idx| format!("chunk {idx}")).collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let index = index_of(&refs);

        let (sampled, effective_count) = sample_chunks(index.chunks(), 5);
        assert_eq!(effective_count, 5);
        assert_eq!(sampled.len(), 7);
    }

    #[tokio::test]
    async fn test_deck_clamped_to_corpus_size() {
        let index = index_of(&["a", "b", "c"]);
        let generator = MockGenerator::new().with_default_response(deck_json(&[
            ("q1", "a1"),
            ("q2", "a2"),
            ("q3", "a3"),
        ]));

        let result = generate(&index, 5, &generator, "en").await;
        assert_eq!(result.cards.len(), 3);
        assert!(result.notice.is_none());

        // The generator was asked for the clamped count, not the original.
        let calls = generator.calls();
        assert!(calls[0].prompt.contains("Generate exactly 3 flashcards"));
    }

    #[tokio::test]
    async fn test_empty_store_skips_generator() {
        let index = index_of(&[]);
        let generator = MockGenerator::new();

        let result = generate(&index, 5, &generator, "en").await;
        assert!(result.cards.is_empty());
        assert!(result.notice.is_none());
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_yields_empty_deck_and_notice() {
        let index = index_of(&["a", "b"]);
        let generator = MockGenerator::new().with_default_response("not json at all");

        let result = generate(&index, 2, &generator, "en").await;
        assert!(result.cards.is_empty());
        let notice = result.notice.expect("parse notice expected");
        assert!(notice.contains("Failed to parse flashcard response"));
    }

    #[tokio::test]
    async fn test_generator_failure_yields_empty_deck_and_notice() {
        let index = index_of(&["a", "b"]);
        let generator = MockGenerator::new().with_failure("rate limited");

        let result = generate(&index, 2, &generator, "en").await;
        assert!(result.cards.is_empty());
        let notice = result.notice.expect("error notice expected");
        assert!(notice.contains("rate limited"));
    }

    #[tokio::test]
    async fn test_request_is_schema_constrained() {
        let index = index_of(&["a", "b", "c", "d"]);
        let generator = MockGenerator::new().with_default_response(deck_json(&[("q", "a")]));

        generate(&index, 2, &generator, "en").await;

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].schema.is_some());
        // All four chunks fit a 2x oversample of a deck of two.
        assert_eq!(
            calls[0].prompt.matches("---DOCUMENT SEPARATOR---").count(),
            3
        );
    }
}
