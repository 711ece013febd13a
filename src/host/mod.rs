//! Line-delimited JSON host driver
//!
//! Stands in for the host application: reads one JSON frame per line, routes
//! it to the in-process bus, directory, settings or command surface, and
//! writes replies as JSON lines.
//!
//! Frames:
//!
//! ```text
//! {"type": "MESSAGE_CREATE", "message": {...}}       bus notification
//! {"command": "/msglog deleted"}                     command line
//! {"command": "msglog", "args": ["stats"]}           command with args
//! {"directory": {"channels": {...}, "users": {...}}} seed directory
//! {"settings": {"logEdited": false}}                 update settings
//! {"lifecycle": "start" | "stop"}                    plugin hooks
//! ```

use std::io::{BufRead, Write};
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::bus::LocalBus;
use crate::commands::CollectedReplies;
use crate::config::LoggerConfig;
use crate::directory::StaticDirectory;
use crate::error::{LoggerError, LoggerResult};
use crate::plugin::MessageLoggerPlugin;

/// Drives a plugin from a stream of JSON frames
pub struct HostDriver {
    plugin: Arc<MessageLoggerPlugin>,
    bus: Arc<LocalBus>,
    directory: Arc<StaticDirectory>,
}

impl HostDriver {
    pub fn new(
        plugin: Arc<MessageLoggerPlugin>,
        bus: Arc<LocalBus>,
        directory: Arc<StaticDirectory>,
    ) -> Self {
        Self {
            plugin,
            bus,
            directory,
        }
    }

    /// Process frames until the reader is exhausted
    pub fn run<R: BufRead, W: Write>(&self, reader: R, mut writer: W) -> LoggerResult<()> {
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            for response in self.handle_frame(trimmed) {
                writeln!(writer, "{}", serde_json::to_string(&response)?)?;
            }
            writer.flush()?;
        }
        Ok(())
    }

    /// Handle one frame, returning the responses to write
    pub fn handle_frame(&self, frame: &str) -> Vec<Value> {
        let value: Value = match serde_json::from_str(frame) {
            Ok(value) => value,
            Err(e) => return vec![json!({"error": "Parse error", "details": e.to_string()})],
        };

        if value.get("type").is_some() {
            let handlers = self.bus.dispatch_value(&value);
            debug!(handlers, "Dispatched notification");
            return Vec::new();
        }
        if let Some(command) = value.get("command").and_then(Value::as_str) {
            return self.run_command(command, value.get("args"));
        }
        if let Some(seed) = value.get("directory") {
            return match self.directory.load_value(seed) {
                Ok(added) => vec![json!({"directory": added})],
                Err(e) => vec![json!({"error": "Invalid directory", "details": e.to_string()})],
            };
        }
        if let Some(overrides) = value.get("settings").and_then(Value::as_object) {
            return match self.apply_settings(overrides) {
                Ok(config) => vec![json!({"settings": config})],
                Err(e) => vec![error_response("Invalid settings", e)],
            };
        }
        if let Some(hook) = value.get("lifecycle").and_then(Value::as_str) {
            return self.run_lifecycle(hook);
        }

        vec![json!({"error": "Unknown frame"})]
    }

    fn apply_settings(&self, overrides: &Map<String, Value>) -> LoggerResult<LoggerConfig> {
        let config = self.plugin.logger().config().with_overrides(overrides)?;
        self.plugin.update_settings(config.clone())?;
        Ok(config)
    }

    fn run_command(&self, command: &str, args: Option<&Value>) -> Vec<Value> {
        let mut line = command.to_string();
        if let Some(args) = args.and_then(Value::as_array) {
            for arg in args.iter().filter_map(Value::as_str) {
                line.push(' ');
                line.push_str(arg);
            }
        }

        let replies = CollectedReplies::new();
        match self.plugin.execute_command(&line, &replies) {
            Ok(()) => replies
                .take()
                .into_iter()
                .map(|text| json!({"reply": text}))
                .collect(),
            Err(e) => vec![error_response("Command failed", e)],
        }
    }

    fn run_lifecycle(&self, hook: &str) -> Vec<Value> {
        match hook {
            "start" => match self.plugin.start() {
                Ok(outcome) => {
                    vec![json!({"lifecycle": "start", "outcome": format!("{:?}", outcome)})]
                }
                Err(e) => vec![error_response("Start failed", e)],
            },
            "stop" => {
                self.plugin.stop();
                vec![json!({"lifecycle": "stop", "bound": self.plugin.is_bound()})]
            }
            other => vec![json!({"error": "Unknown lifecycle hook", "details": other})],
        }
    }
}

fn error_response(message: &str, error: LoggerError) -> Value {
    json!({"error": message, "details": error.to_string()})
}
