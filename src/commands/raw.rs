use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

pub struct RawCommand;

#[async_trait]
impl Command for RawCommand {
    fn name(&self) -> &str {
        "/raw"
    }

    fn description(&self) -> &str {
        "show or hide the raw payload of the last answer"
    }

    async fn execute(&self, session: &Session) -> CommandResult {
        if session.ui().raw.is_none() {
            println!("  no raw data yet");
            return CommandResult::Handled;
        }
        if session.toggle_raw() {
            print!("{}", session.ui().render());
        } else {
            println!("  raw view off");
        }
        CommandResult::Handled
    }
}
