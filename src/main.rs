use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use fanlog::config::{self, Config};
use fanlog::logging::{self, bridge, LevelSpec, Severity};

/// Write a leveled log line to the console and an optional log file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ~/.fanlog/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum level: 1-4 or debug/info/warning/error
    #[arg(short, long)]
    level: Option<String>,

    /// Log file name
    #[arg(long)]
    logfile: Option<String>,

    /// Folder for the log file
    #[arg(long)]
    logpath: Option<String>,

    /// Timestamps in UTC
    #[arg(long)]
    utc: bool,

    /// Do not write to standard output
    #[arg(long)]
    no_console: bool,

    /// Severity of the message
    severity: Severity,

    /// Message text
    #[arg(required = true)]
    message: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<(Config, Severity, String)> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(level) = &self.level {
            config.level = LevelSpec::from_arg(level);
        }
        if self.logfile.is_some() {
            config.logfile = self.logfile;
        }
        if self.logpath.is_some() {
            config.logpath = self.logpath;
        }
        if self.utc {
            config.format.utc = true;
        }
        if self.no_console {
            config.console = false;
        }

        Ok((config, self.severity, self.message.join(" ")))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(config::config_file_path);
    let (config, severity, message) = cli.into_config()?;

    let (logger, _guard) = logging::init_logging(&config);
    bridge::install(Arc::clone(&logger))?;

    let sinks: Vec<&str> = logger.active_sinks().iter().map(|k| k.as_str()).collect();
    tracing::debug!(
        "configuration resolved from {}, writing to {}",
        config_path.display(),
        sinks.join(", ")
    );

    match severity {
        Severity::Debug => logger.debug(format_args!("{}", message)),
        Severity::Info => logger.info(format_args!("{}", message)),
        Severity::Warning => logger.warning(format_args!("{}", message)),
        Severity::Error => logger.error(format_args!("{}", message)),
    }

    Ok(())
}
