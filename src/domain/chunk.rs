use crate::error::{AppError, AppResult};

/// Maximum estimated tokens permitted in a single generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget(usize);

impl TokenBudget {
    pub fn new(value: usize) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Configuration(
                "token budget must be a positive integer".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

/// A budget-sized slice of diff text, submitted as one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub estimated_tokens: usize,
}
