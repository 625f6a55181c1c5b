use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

/// Listed in the registry for help text; dispatch prints the listing itself.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _session: &Session) -> CommandResult {
        CommandResult::Handled
    }
}
