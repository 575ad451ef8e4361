use crate::context::AppContext;
use crate::domain::diff::ChangeScope;
use crate::domain::message::CommitMessage;
use crate::error::AppResult;
use crate::workflow::message::generate_commit_message;

#[derive(Debug, Clone)]
pub struct MessageCommandArgs {
    pub staged: bool,
}

pub async fn run(ctx: &AppContext, args: MessageCommandArgs) -> AppResult<CommitMessage> {
    let scope = if args.staged {
        ChangeScope::Staged
    } else {
        ChangeScope::All
    };
    generate_commit_message(ctx, scope).await
}
