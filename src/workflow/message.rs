use crate::context::AppContext;
use crate::domain::diff::ChangeScope;
use crate::domain::message::CommitMessage;
use crate::error::AppResult;
use crate::summarize::{DiffChunker, TokenEstimator, pipeline};

/// Collect the diffs for the requested scope, chunk them under the
/// configured token budget, and run the map-reduce summarization. Diffs are
/// chunked per file in status order so the combined summaries follow the
/// diff's file order.
pub async fn generate_commit_message(
    ctx: &AppContext,
    scope: ChangeScope,
) -> AppResult<CommitMessage> {
    let diffs = ctx.version_control.collect_diffs(scope).await?;

    let chunker = DiffChunker::new(TokenEstimator::default());
    let chunks = chunker.chunk(
        diffs.iter().map(|diff| diff.text.as_str()),
        ctx.config.token_budget,
    );

    let style_guide = ctx.style_guide.resolve();
    pipeline::run(&chunks, ctx.generator.as_ref(), &style_guide).await
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::config::{AppConfig, ConfigOverrides, StoredConfig};
    use crate::domain::diff::FileDiff;
    use crate::domain::prompt::GenerationRequest;
    use crate::error::AppError;
    use crate::services::{
        StyleGuideResolver, TextGeneratorService, VersionControlService,
    };

    struct FixedDiffs(Vec<FileDiff>);

    #[async_trait]
    impl VersionControlService for FixedDiffs {
        async fn collect_diffs(&self, _scope: ChangeScope) -> AppResult<Vec<FileDiff>> {
            Ok(self.0.clone())
        }
    }

    struct EchoGenerator {
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl TextGeneratorService for EchoGenerator {
        async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
            *self.calls.lock().unwrap() += 1;
            Ok(format!("summary of [{}]", request.user.len()))
        }
    }

    struct FixedStyle;

    impl StyleGuideResolver for FixedStyle {
        fn resolve(&self) -> String {
            "style".to_string()
        }
    }

    fn context(diffs: Vec<FileDiff>, generator: Arc<EchoGenerator>) -> AppContext {
        let config = AppConfig::resolve(
            Path::new("/work"),
            StoredConfig::default(),
            |_| None,
            ConfigOverrides::default(),
        )
        .unwrap();
        AppContext::new(config, Arc::new(FixedDiffs(diffs)), generator, Arc::new(FixedStyle))
    }

    #[tokio::test]
    async fn no_diffs_is_empty_input() {
        let generator = Arc::new(EchoGenerator {
            calls: Mutex::new(0),
        });
        let ctx = context(vec![], generator.clone());
        let result = generate_commit_message(&ctx, ChangeScope::All).await;
        assert!(matches!(result, Err(AppError::EmptyInput)));
        assert_eq!(*generator.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn single_small_diff_takes_one_generation_call() {
        let generator = Arc::new(EchoGenerator {
            calls: Mutex::new(0),
        });
        let diff = FileDiff {
            path: "src/lib.rs".to_string(),
            text: "@@ -1 +1 @@\n-old\n+new".to_string(),
        };
        let ctx = context(vec![diff], generator.clone());
        let message = generate_commit_message(&ctx, ChangeScope::Staged)
            .await
            .unwrap();
        assert!(message.as_str().starts_with("summary of ["));
        assert_eq!(*generator.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn two_diffs_take_two_map_calls_and_one_reduce() {
        let generator = Arc::new(EchoGenerator {
            calls: Mutex::new(0),
        });
        let diff = |path: &str| FileDiff {
            path: path.to_string(),
            text: format!("diff for {path}"),
        };
        let ctx = context(vec![diff("a.rs"), diff("b.rs")], generator.clone());
        generate_commit_message(&ctx, ChangeScope::All).await.unwrap();
        assert_eq!(*generator.calls.lock().unwrap(), 3);
    }
}
