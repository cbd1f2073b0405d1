//! Prompt construction for answer and flashcard generation.
//!
//! Everything here is a pure function of its inputs: the same context, query,
//! and language always produce the same prompt string.

use std::fmt::Write as _;

/// Language code that needs no explicit response-language instruction.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Separator between whole-corpus sample chunks in flashcard context.
pub const DOCUMENT_SEPARATOR: &str = "\n\n---DOCUMENT SEPARATOR---\n\n";

/// Native display names for the language codes the assistant knows about.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("de", "Deutsch"),
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("ja", "日本語"),
    ("ko", "한국어"),
    ("ru", "Русский"),
    ("tr", "Türkçe"),
    ("zh", "中文"),
];

/// Display name for a language code; unknown codes fall back to the code itself.
pub fn language_name(code: &str) -> &str {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |(_, name)| name)
}

/// Joins retrieved chunks into a single context block, each labeled with a
/// 1-based ordinal in retrieval order.
pub fn assemble_context<'chunk, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'chunk str>,
{
    let mut context = String::new();
    for (index, content) in chunks.into_iter().enumerate() {
        if index > 0 {
            context.push_str("\n\n");
        }
        let _ = write!(context, "Document {}:\n{content}", index + 1);
    }
    context
}

/// Joins whole-corpus sample chunks with the flashcard document separator.
pub fn join_sampled<'chunk, I>(chunks: I) -> String
where
    I: IntoIterator<Item = &'chunk str>,
{
    chunks.into_iter().collect::<Vec<_>>().join(DOCUMENT_SEPARATOR)
}

/// Builds the grounded-answer prompt for a chat query.
pub fn answer_prompt(context: &str, query: &str, language: &str) -> String {
    let language_instruction = if language == DEFAULT_LANGUAGE {
        String::new()
    } else {
        format!("Please respond in {}. ", language_name(language))
    };

    format!(
        "You are a knowledgeable AI assistant for a curated knowledge base.\n\
         \n\
         {language_instruction}Using the context below, provide a helpful and accurate answer \
         to the user's question.\n\
         If the context doesn't contain enough information, acknowledge this and provide what \
         information you can.\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         User Question: {query}\n\
         \n\
         Please provide a clear, informative answer:"
    )
}

/// Builds the flashcard-generation prompt for a corpus sample.
pub fn flashcard_prompt(context: &str, count: usize, language: &str) -> String {
    let language_instruction = if language == DEFAULT_LANGUAGE {
        String::new()
    } else {
        let name = language_name(language);
        format!(
            "Create the flashcards in {name}. Both questions and answers should be in {name}. "
        )
    };

    format!(
        "{language_instruction}Create {count} educational flashcards based on the provided \
         context.\n\
         \n\
         Each flashcard should:\n\
         - Have a clear, specific question\n\
         - Include a comprehensive answer\n\
         - Focus on key concepts, technical details, or important facts\n\
         - Be suitable for testing knowledge of the material\n\
         \n\
         Context:\n\
         {context}\n\
         \n\
         Generate exactly {count} flashcards in the specified JSON format."
    )
}
