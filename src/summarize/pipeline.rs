use crate::domain::chunk::Chunk;
use crate::domain::message::CommitMessage;
use crate::domain::prompt::GenerationRequest;
use crate::error::{AppError, AppResult};
use crate::services::TextGeneratorService;

/// Map-reduce over the chunk sequence: summarize each chunk independently,
/// then merge the summaries into one commit message with a final generation
/// call. A single chunk skips the reduce round-trip entirely. The first
/// generator failure aborts the run; nothing partial is ever returned.
pub async fn run(
    chunks: &[Chunk],
    generator: &dyn TextGeneratorService,
    style_guide: &str,
) -> AppResult<CommitMessage> {
    if chunks.is_empty() {
        return Err(AppError::EmptyInput);
    }

    let mut fragments = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let request = GenerationRequest::summarize_chunk(&chunk.text, style_guide);
        fragments.push(generator.generate(&request).await?);
    }

    if fragments.len() == 1 {
        let only = fragments.remove(0);
        return Ok(CommitMessage::new(only.trim().to_string()));
    }

    let combined = combine_fragments(&fragments);
    let request = GenerationRequest::final_message(&combined, style_guide);
    let message = generator.generate(&request).await?;
    Ok(CommitMessage::new(message.trim().to_string()))
}

/// Bullet list of the per-chunk summaries, preserving chunk order. The
/// ordering is load-bearing: the final prose follows the bullet order.
fn combine_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .map(|fragment| format!("- {}", fragment.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}
