use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::session::Session;

pub struct ObjectsCommand;

#[async_trait]
impl Command for ObjectsCommand {
    fn name(&self) -> &str {
        "/objects"
    }

    fn description(&self) -> &str {
        "list remote objects created and not yet deleted"
    }

    async fn execute(&self, session: &Session) -> CommandResult {
        let names = session.coordinator().registered_names();
        if names.is_empty() {
            println!("  no objects");
        }
        for name in names {
            println!("  {name}");
        }
        CommandResult::Handled
    }
}
