use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;
use crate::ui::render_deletes;

pub struct DeleteCommand;

#[async_trait]
impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "/delete"
    }

    fn description(&self) -> &str {
        "delete every remote object created this session"
    }

    async fn execute(&self, session: &Session) -> CommandResult {
        let outcomes = session.delete_all().await;
        print!("{}", render_deletes(&outcomes));
        CommandResult::Handled
    }
}
