use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;
use crate::ui::render_log;

pub struct LogCommand;

#[async_trait]
impl Command for LogCommand {
    fn name(&self) -> &str {
        "/log"
    }

    fn description(&self) -> &str {
        "show every API call made this session, newest first"
    }

    async fn execute(&self, session: &Session) -> CommandResult {
        print!("{}", render_log(&session.coordinator().audit_log().entries()));
        CommandResult::Handled
    }
}
