/// Which local changes the diff collection should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeScope {
    /// Only changes already added to the index.
    Staged,
    /// Everything the working tree reports as changed.
    All,
}

/// Raw diff text for a single changed file.
#[derive(Debug, Clone)]
pub struct FileDiff {
    pub path: String,
    pub text: String,
}

/// Changed files grouped by status, in the order git reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangedFiles {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
}

impl ChangedFiles {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}
