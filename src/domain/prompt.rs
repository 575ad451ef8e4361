/// One generation request: a fixed role instruction, the style guide as
/// context, and the variable content for this call. Keeping the triple
/// structured keeps prompt assembly testable away from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system: String,
    pub context: String,
    pub user: String,
}

const SUMMARIZER_ROLE: &str = "You are a commit message assistant. You summarize code changes \
concisely and factually, focusing on the intent of the change rather than restating the diff.";

impl GenerationRequest {
    /// Map-stage request: summarize one chunk of diff text.
    pub fn summarize_chunk(chunk_text: &str, style_guide: &str) -> Self {
        Self {
            system: SUMMARIZER_ROLE.to_string(),
            context: style_guide.to_string(),
            user: format!("Summarize the following code changes:\n\n{chunk_text}"),
        }
    }

    /// Reduce-stage request: turn the combined per-chunk summaries into the
    /// final commit message.
    pub fn final_message(combined_summaries: &str, style_guide: &str) -> Self {
        Self {
            system: SUMMARIZER_ROLE.to_string(),
            context: style_guide.to_string(),
            user: format!(
                "Based on the summaries below, generate a commit message that follows the style guide:\n{combined_summaries}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_request_carries_chunk_and_style() {
        let request = GenerationRequest::summarize_chunk("diff body", "the style guide");
        assert_eq!(request.context, "the style guide");
        assert!(request.user.contains("diff body"));
        assert!(request.user.starts_with("Summarize the following code changes:"));
    }

    #[test]
    fn reduce_request_carries_summaries_and_style() {
        let request = GenerationRequest::final_message("- a\n- b", "the style guide");
        assert_eq!(request.context, "the style guide");
        assert!(request.user.ends_with("- a\n- b"));
    }

    #[test]
    fn both_stages_share_the_role_instruction() {
        let map = GenerationRequest::summarize_chunk("x", "s");
        let reduce = GenerationRequest::final_message("y", "s");
        assert_eq!(map.system, reduce.system);
    }
}
