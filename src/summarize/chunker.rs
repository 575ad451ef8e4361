use crate::domain::chunk::{Chunk, TokenBudget};
use crate::summarize::estimator::TokenEstimator;

/// Partitions ordered diff texts into an ordered sequence of chunks, each
/// within the token budget. A diff that fits is emitted verbatim as one
/// chunk; a diff that does not is split greedily at word boundaries. Diffs
/// are never merged with each other.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffChunker {
    estimator: TokenEstimator,
}

impl DiffChunker {
    pub fn new(estimator: TokenEstimator) -> Self {
        Self { estimator }
    }

    pub fn chunk<'a>(
        &self,
        diffs: impl IntoIterator<Item = &'a str>,
        budget: TokenBudget,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for diff in diffs {
            let estimated = self.estimator.estimate(diff);
            if estimated == 0 {
                continue;
            }
            if estimated <= budget.get() {
                chunks.push(Chunk {
                    text: diff.to_string(),
                    estimated_tokens: estimated,
                });
            } else {
                self.split_words(diff, budget, &mut chunks);
            }
        }
        chunks
    }

    /// Greedy single pass: accumulate words, close the chunk the moment the
    /// next word would push it over the budget. A lone word that exceeds the
    /// budget by itself cannot be split further and is emitted alone.
    fn split_words(&self, diff: &str, budget: TokenBudget, chunks: &mut Vec<Chunk>) {
        let mut current: Vec<&str> = Vec::new();
        let mut current_tokens = 0usize;

        for word in diff.split_whitespace() {
            let word_tokens = self.estimator.estimate(word);
            if !current.is_empty() && current_tokens + word_tokens > budget.get() {
                chunks.push(self.seal(&current));
                current.clear();
                current_tokens = 0;
            }
            current.push(word);
            current_tokens += word_tokens;
        }

        if !current.is_empty() {
            chunks.push(self.seal(&current));
        }
    }

    fn seal(&self, words: &[&str]) -> Chunk {
        let text = words.join(" ");
        let estimated_tokens = self.estimator.estimate(&text);
        Chunk {
            text,
            estimated_tokens,
        }
    }
}
