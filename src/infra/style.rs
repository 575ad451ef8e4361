use std::fs;
use std::path::PathBuf;

use crate::config::config_directory;
use crate::services::StyleGuideResolver;

const STYLE_FILE_NAME: &str = "COMMIT_STYLE.md";
const STYLE_CACHE_FILE_NAME: &str = "style_guide.md";

pub const DEFAULT_STYLE_GUIDE: &str = "\
# Commit Style Guide

1. Start the commit message with a short summary of the changes.
2. Use the imperative mood in the summary (e.g., \"Add feature\" instead of \"Added feature\").
3. Separate the summary from the body with a blank line.
4. Use the body to provide more detailed information about the changes.
5. Wrap the body at 72 characters per line.
6. Use bullet points for each change or feature added.
7. Use present tense in the body (e.g., \"Fix bug\" instead of \"Fixed bug\").
8. Reference any relevant issues or tickets in the body.
9. Use the style guide consistently across commits.
10. Proofread the commit message before pushing to the repository.
";

/// Resolves the style guide from the project, falling back to the last
/// successfully read copy and finally to the built-in default. Reading is
/// best effort throughout; resolution itself never fails.
pub struct FileStyleGuide {
    workspace_root: PathBuf,
}

impl FileStyleGuide {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    fn cache_path() -> Option<PathBuf> {
        config_directory()
            .ok()
            .map(|dir| dir.join(STYLE_CACHE_FILE_NAME))
    }

    fn cache_copy(text: &str) {
        if let Some(path) = Self::cache_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(path, text);
        }
    }

    fn cached_copy() -> Option<String> {
        fs::read_to_string(Self::cache_path()?).ok()
    }
}

impl StyleGuideResolver for FileStyleGuide {
    fn resolve(&self) -> String {
        match fs::read_to_string(self.workspace_root.join(STYLE_FILE_NAME)) {
            Ok(text) => {
                Self::cache_copy(&text);
                text
            }
            Err(_) => Self::cached_copy().unwrap_or_else(|| DEFAULT_STYLE_GUIDE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_the_default_guide() {
        // No project file, no cache directory.
        unsafe {
            std::env::set_var("SCRIBE_CONFIG_DIR", "/nonexistent/scribe-style-test");
        }
        let resolver = FileStyleGuide::new(PathBuf::from("/nonexistent/workspace"));
        assert_eq!(resolver.resolve(), DEFAULT_STYLE_GUIDE);
    }

    #[test]
    fn default_guide_demands_imperative_mood() {
        assert!(DEFAULT_STYLE_GUIDE.contains("imperative mood"));
    }
}
