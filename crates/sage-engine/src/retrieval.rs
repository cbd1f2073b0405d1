//! The RAG answer flow: similarity search, context assembly, generation.

use sage_core::{GenerationRequest, Result, TextGenerator};
use sage_index::{EmbeddingProvider, SemanticIndex};
use tracing::{debug, warn};

use crate::prompt;

/// Fixed reply when retrieval finds nothing for a query.
pub const NO_RELEVANT_INFORMATION: &str =
    "No relevant information was found in the knowledge base for this question.";

/// Number of chunks retrieved per query.
const TOP_K: usize = 4;

/// Answers a query from the corpus, grounded in retrieved context.
///
/// This is the interactive surface of the pipeline and never fails: any
/// retrieval or generation error is folded into a user-facing string
/// carrying the error detail, so one bad query cannot take the session down.
pub async fn answer<E, G>(
    query: &str,
    index: &SemanticIndex<E>,
    generator: &G,
    language: &str,
) -> String
where
    E: EmbeddingProvider,
    G: TextGenerator + ?Sized,
{
    match try_answer(query, index, generator, language).await {
        Ok(text) => text,
        Err(error) => {
            warn!("Answer pipeline failed: {error}");
            format!("Error while processing the question: {error}")
        }
    }
}

/// Fallible core of [`answer`].
async fn try_answer<E, G>(
    query: &str,
    index: &SemanticIndex<E>,
    generator: &G,
    language: &str,
) -> Result<String>
where
    E: EmbeddingProvider,
    G: TextGenerator + ?Sized,
{
    let hits = index.similarity_search(query, TOP_K).await?;
    debug!("Retrieved {} chunks for query", hits.len());

    if hits.is_empty() {
        return Ok(NO_RELEVANT_INFORMATION.to_owned());
    }

    let context = prompt::assemble_context(hits.iter().map(|hit| hit.chunk.content.as_str()));
    let answer_prompt = prompt::answer_prompt(&context, query, language);

    generator.generate(&GenerationRequest::new(answer_prompt)).await
}
