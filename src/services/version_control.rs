use async_trait::async_trait;

use crate::domain::diff::{ChangeScope, FileDiff};
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Collect raw diff texts for the requested scope, one per changed
    /// file, in the order the working tree reports them.
    async fn collect_diffs(&self, scope: ChangeScope) -> AppResult<Vec<FileDiff>>;
}
