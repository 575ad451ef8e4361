use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use crate::domain::diff::{ChangeScope, ChangedFiles, FileDiff};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn run_git(&self, args: &[&str]) -> AppResult<String> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "git {} failed: {}",
                args.first().copied().unwrap_or(""),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn changed_files(&self, scope: ChangeScope) -> AppResult<ChangedFiles> {
        let mut args = vec!["status", "--porcelain"];
        if scope == ChangeScope::Staged {
            args.push("--untracked-files=no");
        }
        let stdout = self.run_git(&args).await?;
        Ok(parse_status_porcelain(&stdout))
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn collect_diffs(&self, scope: ChangeScope) -> AppResult<Vec<FileDiff>> {
        let files = self.changed_files(scope).await?;

        let mut diffs = Vec::with_capacity(files.modified.len());
        for path in &files.modified {
            let mut args = vec!["diff"];
            if scope == ChangeScope::Staged {
                args.push("--staged");
            }
            args.push("--");
            args.push(path);
            let text = self.run_git(&args).await?;
            diffs.push(FileDiff {
                path: path.clone(),
                text,
            });
        }
        Ok(diffs)
    }
}

/// Parse `git status --porcelain` output into status buckets, keeping
/// git's line order within each bucket. A path counts as added before
/// modified before deleted when its two status columns mix.
fn parse_status_porcelain(stdout: &str) -> ChangedFiles {
    let mut files = ChangedFiles::default();
    for line in stdout.lines() {
        if line.len() < 4 {
            continue;
        }
        let (status, path) = (&line[..2], &line[3..]);
        if status.contains('A') {
            files.added.push(path.to_string());
        } else if status.contains('M') {
            files.modified.push(path.to_string());
        } else if status.contains('D') {
            files.deleted.push(path.to_string());
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_porcelain_lines() {
        let stdout = "A  src/new.rs\n M src/lib.rs\nM  src/main.rs\n D gone.rs\n";
        let files = parse_status_porcelain(stdout);
        assert_eq!(files.added, vec!["src/new.rs"]);
        assert_eq!(files.modified, vec!["src/lib.rs", "src/main.rs"]);
        assert_eq!(files.deleted, vec!["gone.rs"]);
    }

    #[test]
    fn added_wins_over_modified_in_mixed_status() {
        let files = parse_status_porcelain("AM src/both.rs\n");
        assert_eq!(files.added, vec!["src/both.rs"]);
        assert!(files.modified.is_empty());
    }

    #[test]
    fn empty_status_yields_no_files() {
        let files = parse_status_porcelain("");
        assert!(files.is_empty());
    }

    #[test]
    fn ignores_untracked_and_short_lines() {
        let files = parse_status_porcelain("?? scratch.txt\n\n");
        assert!(files.is_empty());
    }
}
