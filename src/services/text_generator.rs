use async_trait::async_trait;

use crate::domain::prompt::GenerationRequest;
use crate::error::AppResult;

#[async_trait]
pub trait TextGeneratorService: Send + Sync {
    /// Generate text for one request. Fails with `AppError::Authentication`
    /// when the backend rejects the credential and `AppError::Backend` for
    /// anything else; both abort the run that issued the call.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
