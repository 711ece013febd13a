//! Command surface
//!
//! Commands are registered by name and render a text report that is sent
//! through a [`ReplyChannel`]. The logger registers a single command family,
//! `msglog`, with subcommands `deleted`, `edited`, `bulk`, `stats` and
//! `clear`; anything else shows the help text.

mod msglog;
pub mod render;

use std::collections::HashMap;

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::{CommandError, LoggerResult};

pub use msglog::MsglogCommand;

/// Command metadata exposed to the host's command dispatcher
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: String,
    pub description: String,
}

/// A named command producing a text reply
pub trait Command: Send + Sync {
    fn definition(&self) -> CommandDefinition;

    /// Run with the arguments following the command name
    fn execute(&self, args: &[String]) -> LoggerResult<String>;

    fn name(&self) -> String {
        self.definition().name
    }
}

/// Where command output goes
pub trait ReplyChannel {
    fn send_reply(&self, text: &str);
}

/// Reply channel that keeps every reply in memory
#[derive(Debug, Default)]
pub struct CollectedReplies {
    replies: Mutex<Vec<String>>,
}

impl CollectedReplies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.replies.lock())
    }

    pub fn last(&self) -> Option<String> {
        self.replies.lock().last().cloned()
    }
}

impl ReplyChannel for CollectedReplies {
    fn send_reply(&self, text: &str) {
        self.replies.lock().push(text.to_string());
    }
}

/// Commands by name
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, command: Box<dyn Command>) -> &mut Self {
        let name = command.name();
        self.commands.insert(name, command);
        self
    }

    pub fn definitions(&self) -> Vec<CommandDefinition> {
        let mut definitions: Vec<CommandDefinition> =
            self.commands.values().map(|c| c.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Run a command and send its output to `reply`
    pub fn execute(&self, name: &str, args: &[String], reply: &dyn ReplyChannel) -> LoggerResult<()> {
        let command = self
            .commands
            .get(name)
            .ok_or_else(|| CommandError::Unknown(name.to_string()))?;
        let text = command.execute(args)?;
        reply.send_reply(&text);
        Ok(())
    }

    /// Parse `/msglog deleted` style input and run it
    pub fn execute_line(&self, line: &str, reply: &dyn ReplyChannel) -> LoggerResult<()> {
        let (name, args) = parse_invocation(line)?;
        self.execute(&name, &args, reply)
    }
}

/// Split a command line into name and arguments, dropping a leading `/`
pub fn parse_invocation(line: &str) -> Result<(String, Vec<String>), CommandError> {
    let mut parts = line.split_whitespace();
    let name = parts
        .next()
        .map(|first| first.trim_start_matches('/'))
        .filter(|name| !name.is_empty())
        .ok_or(CommandError::Empty)?;
    Ok((name.to_string(), parts.map(str::to_string).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoggerError;

    struct Echo;

    impl Command for Echo {
        fn definition(&self) -> CommandDefinition {
            CommandDefinition {
                name: "echo".to_string(),
                description: "Echo arguments".to_string(),
            }
        }

        fn execute(&self, args: &[String]) -> LoggerResult<String> {
            Ok(args.join(" "))
        }
    }

    #[test]
    fn test_parse_invocation() {
        assert_eq!(
            parse_invocation("/msglog  deleted extra").unwrap(),
            (
                "msglog".to_string(),
                vec!["deleted".to_string(), "extra".to_string()]
            )
        );
        assert_eq!(parse_invocation("stats").unwrap().1, Vec::<String>::new());
        assert!(matches!(parse_invocation("   "), Err(CommandError::Empty)));
        assert!(matches!(parse_invocation("/"), Err(CommandError::Empty)));
    }

    #[test]
    fn test_registry_executes_and_replies() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(Echo));
        let replies = CollectedReplies::new();

        registry.execute_line("/echo a b", &replies).unwrap();

        assert_eq!(replies.take(), vec!["a b".to_string()]);
        assert_eq!(registry.definitions()[0].name, "echo");
    }

    #[test]
    fn test_unknown_command() {
        let registry = CommandRegistry::new();
        let replies = CollectedReplies::new();

        let result = registry.execute("nope", &[], &replies);
        assert!(matches!(
            result,
            Err(LoggerError::Command(CommandError::Unknown(_)))
        ));
        assert!(replies.last().is_none());
    }
}
