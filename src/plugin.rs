//! Plugin lifecycle
//!
//! [`MessageLoggerPlugin`] is what the host sees: `start`/`stop` hooks, the
//! `msglog` command, and settings updates. It owns one engine instance and
//! the subscription manager that binds it to the bus.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::bus::EventBus;
use crate::commands::{CommandRegistry, MsglogCommand, ReplyChannel};
use crate::config::{LoggerConfig, SettingsStore};
use crate::directory::Directory;
use crate::engine::MessageLogger;
use crate::error::LoggerResult;
use crate::notify::Observer;
use crate::subscription::{StartOutcome, SubscriptionManager};

/// The message logger as a host plugin
pub struct MessageLoggerPlugin {
    logger: Arc<MessageLogger>,
    settings: Arc<dyn SettingsStore>,
    bus: Option<Arc<dyn EventBus>>,
    subscriptions: Mutex<SubscriptionManager>,
    commands: CommandRegistry,
}

impl MessageLoggerPlugin {
    /// Build the plugin from its host collaborators
    ///
    /// `bus` is `None` when the host's dispatcher could not be found; the
    /// plugin then still answers commands, over empty logs.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        bus: Option<Arc<dyn EventBus>>,
        directory: Arc<dyn Directory>,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let config = LoggerConfig::load(settings.as_ref());
        let logger = Arc::new(
            MessageLogger::new(config)
                .with_directory(directory)
                .with_observer(observer),
        );

        let mut commands = CommandRegistry::new();
        commands.register(Box::new(MsglogCommand::new(Arc::clone(&logger))));

        Self {
            logger,
            settings,
            bus,
            subscriptions: Mutex::new(SubscriptionManager::new()),
            commands,
        }
    }

    pub fn logger(&self) -> &Arc<MessageLogger> {
        &self.logger
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn is_bound(&self) -> bool {
        self.subscriptions.lock().is_bound()
    }

    /// Reload settings and subscribe to the bus
    pub fn start(&self) -> LoggerResult<StartOutcome> {
        let mut subscriptions = self.subscriptions.lock();
        if subscriptions.is_bound() {
            return Ok(StartOutcome::AlreadyBound);
        }

        self.logger
            .apply_config(LoggerConfig::load(self.settings.as_ref()))?;

        let Some(bus) = self.bus.clone() else {
            warn!("No event bus available; message events will not be logged");
            return Ok(StartOutcome::Detached);
        };

        let outcome = subscriptions.start(bus, &self.logger)?;
        info!(?outcome, "Message logger started");
        Ok(outcome)
    }

    /// Release every subscription; safe to call repeatedly
    pub fn stop(&self) {
        let released = self.subscriptions.lock().stop();
        info!(released, "Message logger stopped");
    }

    /// Persist and apply new settings, rebinding if currently bound
    pub fn update_settings(&self, config: LoggerConfig) -> LoggerResult<()> {
        config.validate()?;
        config.save(self.settings.as_ref())?;
        self.logger.apply_config(config)?;

        let mut subscriptions = self.subscriptions.lock();
        if subscriptions.is_bound() {
            if let Some(bus) = self.bus.clone() {
                subscriptions.stop();
                subscriptions.start(bus, &self.logger)?;
            }
        }
        Ok(())
    }

    /// Run a command line such as `/msglog deleted`
    pub fn execute_command(&self, line: &str, reply: &dyn ReplyChannel) -> LoggerResult<()> {
        self.commands.execute_line(line, reply)
    }
}
