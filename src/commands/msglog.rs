//! The `msglog` command family

use std::sync::Arc;

use crate::engine::MessageLogger;
use crate::error::LoggerResult;

use super::render::{
    render_bulk, render_deleted, render_edited, render_stats, BULK_LIMIT, CLEARED_TEXT, HELP_TEXT,
    RECENT_LIMIT,
};
use super::{Command, CommandDefinition};

/// Reports over the logger's history
pub struct MsglogCommand {
    logger: Arc<MessageLogger>,
}

impl MsglogCommand {
    pub fn new(logger: Arc<MessageLogger>) -> Self {
        Self { logger }
    }
}

impl Command for MsglogCommand {
    fn definition(&self) -> CommandDefinition {
        CommandDefinition {
            name: "msglog".to_string(),
            description: "Message logger commands".to_string(),
        }
    }

    fn execute(&self, args: &[String]) -> LoggerResult<String> {
        let subcommand = args.first().map(|s| s.to_lowercase()).unwrap_or_default();

        let text = match subcommand.as_str() {
            "deleted" => render_deleted(&self.logger.list_deleted(RECENT_LIMIT)),
            "edited" => render_edited(&self.logger.list_edited(RECENT_LIMIT)),
            "bulk" => render_bulk(&self.logger.list_bulk(BULK_LIMIT)),
            "stats" => render_stats(&self.logger.stats()),
            "clear" => {
                self.logger.reset_all();
                CLEARED_TEXT.to_string()
            }
            _ => HELP_TEXT.to_string(),
        };
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageSnapshot;

    fn run(command: &MsglogCommand, args: &[&str]) -> String {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        command.execute(&args).unwrap()
    }

    #[test]
    fn test_deleted_report_is_capped_at_ten() {
        let logger = Arc::new(MessageLogger::default());
        for i in 0..12 {
            let id = i.to_string();
            logger.on_create(MessageSnapshot::new(&id, "7", &format!("msg{}", i)));
            logger.on_delete("7", &id);
        }
        let command = MsglogCommand::new(logger);

        let out = run(&command, &["DELETED"]);
        assert!(out.starts_with("**Deleted Messages (12):**"));
        assert!(out.contains("**10.**"));
        assert!(!out.contains("**11.**"));
        assert!(out.contains("Content: msg11"));
    }

    #[test]
    fn test_bulk_report_is_capped_at_five() {
        let logger = Arc::new(MessageLogger::default());
        for _ in 0..7 {
            logger.on_bulk_delete("7", &["1".to_string()]);
        }
        let command = MsglogCommand::new(logger);

        let out = run(&command, &["bulk"]);
        assert!(out.starts_with("**Bulk Deletions (7):**"));
        assert!(out.contains("**5.** 1 messages in #Unknown Channel"));
        assert!(!out.contains("**6.**"));
    }

    #[test]
    fn test_clear_and_stats() {
        let logger = Arc::new(MessageLogger::default());
        logger.on_create(MessageSnapshot::new("1", "7", "a"));
        logger.on_delete("7", "1");
        let command = MsglogCommand::new(logger.clone());

        assert!(run(&command, &["stats"]).contains("Deleted Messages: 1"));
        assert_eq!(run(&command, &["clear"]), "Message logs cleared.");
        assert!(logger.stats().is_empty());
        assert_eq!(run(&command, &["edited"]), "No edited messages logged.");
    }

    #[test]
    fn test_default_is_help() {
        let command = MsglogCommand::new(Arc::new(MessageLogger::default()));
        assert_eq!(run(&command, &[]), HELP_TEXT);
        assert_eq!(run(&command, &["unknown"]), HELP_TEXT);
    }
}
