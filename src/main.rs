//! Message Logger - Binary Entry Point
//!
//! Reads bus notifications and commands as JSON lines on stdin and writes
//! replies to stdout. Diagnostics go to stderr.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use message_logger::directory::StaticDirectory;
use message_logger::notify::TracingObserver;
use message_logger::{
    EventBus, HostDriver, JsonFileSettings, LocalBus, LoggerResult, MessageLoggerPlugin,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SETTINGS_PATH_VAR: &str = "MSGLOG_SETTINGS_PATH";
const DEFAULT_SETTINGS_FILE: &str = "msglog-settings.json";

fn settings_path() -> PathBuf {
    let current_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match env::var(SETTINGS_PATH_VAR) {
        Ok(path) if Path::new(&path).is_absolute() => PathBuf::from(path),
        Ok(path) => current_dir.join(path),
        Err(_) => current_dir.join(DEFAULT_SETTINGS_FILE),
    }
}

fn main() -> LoggerResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = Arc::new(JsonFileSettings::open(settings_path())?);
    info!(path = %settings.path().display(), "Using settings file");

    let bus = Arc::new(LocalBus::new());
    let directory = Arc::new(StaticDirectory::new());
    let plugin = Arc::new(MessageLoggerPlugin::new(
        settings,
        Some(bus.clone() as Arc<dyn EventBus>),
        directory.clone(),
        Arc::new(TracingObserver),
    ));
    plugin.start()?;

    let on_signal = Arc::clone(&plugin);
    ctrlc::set_handler(move || {
        on_signal.stop();
        std::process::exit(0);
    })?;

    let driver = HostDriver::new(Arc::clone(&plugin), bus, directory);
    let result = driver.run(io::stdin().lock(), io::stdout().lock());

    plugin.stop();
    result
}
