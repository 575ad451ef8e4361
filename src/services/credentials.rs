use async_trait::async_trait;

use crate::error::AppResult;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Produce a bearer token valid for the backend. How it is acquired
    /// (cache, interactive login) is the provider's business.
    async fn bearer_token(&self) -> AppResult<String>;
}
