/// Approximates backend token cost without the backend tokenizer: token
/// count is roughly the whitespace-delimited word count times a fixed
/// multiplier, rounded up. Deterministic, and adding words never lowers
/// the estimate, which is all the chunker relies on.
#[derive(Debug, Clone, Copy)]
pub struct TokenEstimator {
    multiplier: f64,
}

/// Each word roughly corresponds to one and a half backend tokens.
const DEFAULT_MULTIPLIER: f64 = 1.5;

impl TokenEstimator {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    pub fn estimate(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words as f64 * self.multiplier).ceil() as usize
    }
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_costs_nothing() {
        assert_eq!(TokenEstimator::default().estimate(""), 0);
        assert_eq!(TokenEstimator::default().estimate("  \n\t "), 0);
    }

    #[test]
    fn counts_words_times_multiplier() {
        let estimator = TokenEstimator::new(1.5);
        assert_eq!(estimator.estimate("one"), 2);
        assert_eq!(estimator.estimate("one two"), 3);
        assert_eq!(estimator.estimate("one two three four"), 6);
    }

    #[test]
    fn unit_multiplier_counts_words() {
        let estimator = TokenEstimator::new(1.0);
        assert_eq!(estimator.estimate("a b c d e"), 5);
    }

    #[test]
    fn estimate_is_deterministic() {
        let estimator = TokenEstimator::default();
        let text = "diff --git a/src/main.rs b/src/main.rs";
        assert_eq!(estimator.estimate(text), estimator.estimate(text));
    }

    #[test]
    fn adding_text_never_decreases_the_estimate() {
        let estimator = TokenEstimator::default();
        let mut text = String::new();
        let mut previous = 0;
        for word in ["fn", "main", "()", "{", "println!", "}"] {
            text.push(' ');
            text.push_str(word);
            let estimate = estimator.estimate(&text);
            assert!(estimate >= previous);
            previous = estimate;
        }
    }
}
